use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = mesh_api::Args::parse();
	mesh_api::run(args).await
}
