mod common;

use std::sync::Arc;

use common::{LocalTransport, TestServer};
use ec2_query::{Client, ClientConfig, Error, ResponseValue};
use http::StatusCode;
use serde_json::json;

const DESCRIBE_REGIONS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeRegionsResponse xmlns="http://ec2.amazonaws.com/doc/2016-11-15/">
   <requestId>59dbff89-35bd-4eac-99ed-be587EXAMPLE</requestId>
   <regionInfo>
      <item>
         <regionName>us-east-2</regionName>
         <regionEndpoint>ec2.us-east-2.amazonaws.com</regionEndpoint>
      </item>
      <item>
         <regionName>eu-west-1</regionName>
         <regionEndpoint>ec2.eu-west-1.amazonaws.com</regionEndpoint>
      </item>
   </regionInfo>
</DescribeRegionsResponse>"#;

const AUTH_FAILURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
   <Errors>
      <Error>
         <Code>AuthFailure</Code>
         <Message>AWS was not able to validate the provided access credentials</Message>
      </Error>
   </Errors>
   <RequestID>b25f4a8f-a2d4-4f2e-9a3b-EXAMPLE</RequestID>
</Response>"#;

fn client_for(
    server: &TestServer,
    format: &str,
) -> Result<(Client, Arc<std::sync::Mutex<Vec<url::Url>>>), Error> {
    let transport = LocalTransport::new(server.addr);
    let urls = Arc::clone(&transport.original_urls);
    let client = Client::builder("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY")
        .region("eu-west-1")
        .use_tls(true)
        .action("DescribeRegions")
        .return_format(format)
        .transport(transport)
        .build()?;
    Ok((client, urls))
}

#[test]
fn execute_returns_json_text_for_success() -> Result<(), Error> {
    let server = TestServer::start("200 OK", DESCRIBE_REGIONS, 1)?;
    let (client, urls) = client_for(&server, "json")?;

    let value = client.execute();
    let requests = server.finish();

    let Some(ResponseValue::Json(text)) = &value else {
        panic!("expected json response, got {value:?}");
    };
    let parsed: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::decode("test response is not JSON", Some(Box::new(e))))?;
    assert_eq!(
        parsed["regionInfo"]["item"][1]["regionName"],
        json!("eu-west-1")
    );

    assert_eq!(requests.len(), 1);
    let request_line = requests[0].lines().next().unwrap_or_default();
    let expected_prefix = "GET /?AWSAccessKeyId=AKIDEXAMPLE&Action=DescribeRegions&Signature=";
    assert!(request_line.starts_with(expected_prefix));
    assert!(
        request_line.contains("&SignatureMethod=HmacSHA256&SignatureVersion=2&Timestamp=")
    );

    let urls = urls.lock().map(|u| u.clone()).unwrap_or_default();
    assert_eq!(urls.len(), 1);
    assert_eq!(urls[0].scheme(), "https");
    assert_eq!(urls[0].host_str(), Some("eu-west-1.ec2.amazonaws.com"));
    Ok(())
}

#[test]
fn execute_returns_structured_value() -> Result<(), Error> {
    let server = TestServer::start("200 OK", DESCRIBE_REGIONS, 1)?;
    let (client, _) = client_for(&server, "structured")?;

    let value = client.execute();
    server.finish();

    let value = value.and_then(|v| v.as_structured().cloned());
    assert_eq!(
        value.as_ref().map(|v| v["requestId"].clone()),
        Some(json!("59dbff89-35bd-4eac-99ed-be587EXAMPLE"))
    );
    Ok(())
}

#[test]
fn execute_returns_raw_body_unmodified() -> Result<(), Error> {
    let server = TestServer::start("200 OK", DESCRIBE_REGIONS, 1)?;
    let (client, _) = client_for(&server, "raw")?;

    let value = client.execute();
    server.finish();

    assert_eq!(value, Some(ResponseValue::Text(DESCRIBE_REGIONS.to_string())));
    Ok(())
}

#[test]
fn execute_yields_none_for_server_error() -> Result<(), Error> {
    let server = TestServer::start("500 Internal Server Error", "", 1)?;
    let (client, _) = client_for(&server, "json")?;

    assert!(client.execute().is_none());
    assert_eq!(server.finish().len(), 1);
    Ok(())
}

#[test]
fn send_surfaces_service_error_details() -> Result<(), Error> {
    let server = TestServer::start("401 Unauthorized", AUTH_FAILURE, 2)?;
    let (client, _) = client_for(&server, "json")?;

    let err = client.send().err();
    assert!(client.execute().is_none());
    server.finish();

    let Some(err) = err else {
        panic!("expected an error for 401");
    };
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert_eq!(err.code(), Some("AuthFailure"));
    assert_eq!(err.request_id(), Some("b25f4a8f-a2d4-4f2e-9a3b-EXAMPLE"));
    Ok(())
}

#[test]
fn construction_never_touches_the_network() {
    let config = ClientConfig {
        region: Some("us-west-2".to_string()),
        ..ClientConfig::new("AKIDEXAMPLE", "")
    };
    let err = Client::new(config).unwrap_err();
    assert!(err.is_configuration());
}
