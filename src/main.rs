#[tokio::main]
async fn main() -> anyhow::Result<()> {
    promohunt::mcp::run_server().await
}
