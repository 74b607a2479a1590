use anyhow::Result;

fn main() -> Result<()> {
    etude::repl::run()
}
