#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mediashelf_lib::main().await
}
