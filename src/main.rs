mod config;
mod nav;
mod gains;

use std::process;
use clap::{Arg, App};
use chrono::Utc;

use crate::config::Config;
use crate::gains::assessor::Assessor;
use crate::nav::NavProvider;

fn main() {
    let matches = App::new("SipTax")
        .version("0.1.0")
        .about("Computes capital gains tax for mutual fund SIP investments")
        .arg(Arg::with_name("config_path")
            .short("c")
            .long("config")
            .takes_value(true)
            .help("Config file"))
        .arg(Arg::with_name("output_path")
            .short("o")
            .long("output")
            .takes_value(true)
            .help("Capital gains statement to write"))
        .arg(Arg::with_name("clear")
            .long("clear")
            .takes_value(false)
            .help("Clears the NAV cache"))
        .get_matches();

    let conf_path = matches.value_of("config_path").unwrap_or("config.yaml");
    let output_path = matches.value_of("output_path").unwrap_or("capital_gains.csv");
    let clear_cache = matches.is_present("clear");

    let config = Config::new(conf_path).unwrap_or_else(|err| {
        println!("Unable to read config file \"{}\": {}", conf_path, err);
        process::exit(1);
    });

    let mut nav_provider = NavProvider::new();
    if clear_cache {
        nav_provider.clear();
    }

    let historical = nav_provider.fetch(&config.historical_nav_url).unwrap_or_else(|err| {
        println!("Unable to fetch historical NAV data: {}", err);
        process::exit(1);
    });
    let latest = nav_provider.fetch(&config.latest_nav_url).unwrap_or_else(|err| {
        println!("Unable to fetch latest NAV data: {}", err);
        process::exit(1);
    });

    let current = latest.latest().copied().unwrap_or_else(|| {
        println!("Latest NAV endpoint returned no quotes");
        process::exit(1);
    });
    let as_of = config.as_of_date.unwrap_or_else(|| Utc::now().date_naive());

    let report = Assessor::new(&historical, as_of)
        .precision(config.currency_precision)
        .assess(&config, current.nav)
        .unwrap_or_else(|err| {
            println!("Calculation failed: {}", err);
            process::exit(1);
        });

    report.print_summary();
    report.write_to_file(output_path).unwrap_or_else(|err| {
        println!("Unable to write \"{}\": {}", output_path, err);
        process::exit(1);
    });
}
