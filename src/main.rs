fn main() -> anyhow::Result<()> {
    dashboard_lib::run()
}
