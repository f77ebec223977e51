//! Calls DescribeRegions and prints the response.
//!
//! ```text
//! EC2_ACCESS_KEY=... EC2_SECRET_KEY=... cargo run --example describe_regions -- eu-west-1 json
//! ```

use std::env;

use ec2_query::{Client, Error, ResponseValue};

fn main() -> Result<(), Error> {
    let access_key = env::var("EC2_ACCESS_KEY")
        .map_err(|_| Error::configuration("missing EC2_ACCESS_KEY"))?;
    let secret_key = env::var("EC2_SECRET_KEY")
        .map_err(|_| Error::configuration("missing EC2_SECRET_KEY"))?;

    let mut args = env::args().skip(1);
    let region = args
        .next()
        .unwrap_or_else(|| ec2_query::DEFAULT_REGION.to_string());
    let format = args.next().unwrap_or_else(|| "json".to_string());

    let client = Client::builder(access_key, secret_key)
        .region(region)
        .use_tls(true)
        .action("DescribeRegions")
        .return_format(format)
        .build()?;

    match client.send()? {
        ResponseValue::Structured(value) => println!("{value:#}"),
        other => println!("{}", other.into_string()),
    }
    Ok(())
}
