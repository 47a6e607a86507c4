fn main() -> anyhow::Result<()> {
    hearth_app::platform::run_app()
}
