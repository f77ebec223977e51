mod common;

use ec2_query::{Client, Error, ResponseValue};

#[test]
fn live_describe_regions() -> Result<(), Error> {
    let Some(cfg) = common::load_live_config()? else {
        return Ok(());
    };

    let client = Client::builder(cfg.access_key, cfg.secret_key)
        .region(cfg.region.as_str())
        .use_tls(true)
        .action("DescribeRegions")
        .return_format("structured")
        .build()?;

    let value = client.send()?;
    let Some(tree) = value.as_structured() else {
        panic!("expected structured response, got {value:?}");
    };
    assert!(tree.get("regionInfo").is_some());

    let mut client = client;
    client.set_return_format("xml")?;
    match client.execute() {
        Some(ResponseValue::Text(body)) => assert!(body.contains("DescribeRegionsResponse")),
        other => panic!("expected xml body, got {other:?}"),
    }
    Ok(())
}
