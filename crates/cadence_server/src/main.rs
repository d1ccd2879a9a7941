#[tokio::main]
async fn main() {
    cadence_server::start_server().await;
}
