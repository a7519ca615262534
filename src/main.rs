#[tokio::main]
async fn main() {
    roundkeeper::run().await;
}
