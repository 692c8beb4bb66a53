use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = geofront_api::Args::parse();

	geofront_api::run(args).await
}
