#[tokio::main]
async fn main() {
    subtitle_desk::run().await
}
