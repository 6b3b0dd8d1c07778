#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gridscribe_cli::run().await
}
