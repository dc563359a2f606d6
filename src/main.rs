fn main() -> anyhow::Result<()> {
    script_reader::run()
}
