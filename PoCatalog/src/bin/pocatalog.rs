fn main() -> anyhow::Result<()> {
    pocatalog::cli::run_cli()
}
