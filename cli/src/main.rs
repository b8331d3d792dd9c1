fn main() -> anyhow::Result<()> {
    wikiview_lib::run()
}
