#[tokio::main]
async fn main() -> anyhow::Result<()> {
    flashcards_cli::run().await
}
