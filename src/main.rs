fn main() -> anyhow::Result<()> {
    coffee_smoke::app::run()
}
