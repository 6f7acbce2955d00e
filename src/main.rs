use std::env;

use enumerables::{config::Config, demos, observer::ConsoleSink, Error};

fn main() -> Result<(), Error> {
    env_logger::init();
    let config = Config::from_args(env::args().skip(1))?;
    if config.list {
        for name in demos::names() {
            println!("{}", name);
        }
        return Ok(());
    }
    demos::run(&config.demo, &ConsoleSink, &config)
}
