mod command;
mod logging;
mod table;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
