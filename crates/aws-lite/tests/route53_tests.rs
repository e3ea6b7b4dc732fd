use aws_lite::signing::hmac_sha256_base64;
use aws_lite::{AwsClient, AwsResult, RequestOptions, XmlElement};
use reqwest::Method;
use tokio::sync::oneshot;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const LIST_HOSTED_ZONES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListHostedZonesResponse xmlns="https://route53.amazonaws.com/doc/2011-05-05/">
  <HostedZones>
    <HostedZone>
      <Id>/hostedzone/Z1PA6795UKMFR9</Id>
      <Name>example.com.</Name>
      <CallerReference>MyUniqueIdentifier1</CallerReference>
      <ResourceRecordSetCount>17</ResourceRecordSetCount>
    </HostedZone>
  </HostedZones>
  <IsTruncated>false</IsTruncated>
  <MaxItems>100</MaxItems>
</ListHostedZonesResponse>"#;

const NO_SUCH_ZONE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ErrorResponse xmlns="https://route53.amazonaws.com/doc/2011-05-05/">
  <Error>
    <Type>Sender</Type>
    <Code>NoSuchHostedZone</Code>
    <Message>No hosted zone found with ID: Z0000</Message>
  </Error>
  <RequestId>d4b05d0e-6b3b-11e0-b0e6-example</RequestId>
</ErrorResponse>"#;

const SECRET: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";

fn client() -> AwsClient {
    AwsClient::with_credentials("AKIDEXAMPLE", SECRET).unwrap()
}

fn header_value<'a>(request: &'a Request, name: &str) -> &'a str {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn run_with_callback(client: &AwsClient, opts: RequestOptions) -> AwsResult<XmlElement> {
    let (tx, rx) = oneshot::channel();
    let handle = client
        .route53()
        .request(opts.callback(move |result| {
            let _ = tx.send(result);
        }))
        .unwrap();
    handle.await.unwrap();
    rx.await.unwrap()
}

#[tokio::test]
async fn test_list_hosted_zones_signed_and_bodyless() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2011-05-05/hostedzone"))
        .and(header_exists("date"))
        .and(header_exists("x-amzn-authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LIST_HOSTED_ZONES))
        .expect(1)
        .mount(&server)
        .await;

    let client = client();
    let zones = run_with_callback(
        &client,
        RequestOptions::new("hostedzone").base_uri(format!("{}/", server.uri())),
    )
    .await
    .unwrap();

    let zone = zones.child("HostedZones").and_then(|z| z.child("HostedZone")).unwrap();
    assert_eq!(zone.child_text("Name"), Some("example.com."));

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];
    assert!(request.body.is_empty());

    let date = header_value(request, "date");
    let expected = format!(
        "AWS3-HTTPS AWSAccessKeyId=AKIDEXAMPLE,Algorithm=HmacSHA256,Signature={}",
        hmac_sha256_base64(SECRET, date).unwrap()
    );
    assert_eq!(header_value(request, "x-amzn-authorization"), expected);
    assert!(date.ends_with(" GMT"));
}

#[tokio::test]
async fn test_caller_headers_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LIST_HOSTED_ZONES))
        .mount(&server)
        .await;

    client()
        .route53()
        .send(
            RequestOptions::new("hostedzone")
                .base_uri(format!("{}/", server.uri()))
                .header("X-Custom", "1"),
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("x-custom").is_none());
}

#[tokio::test]
async fn test_post_with_xml_body_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2011-05-05/hostedzone"))
        .and(query_param("trace", "1"))
        .respond_with(ResponseTemplate::new(201).set_body_string(
            "<CreateHostedZoneResponse><HostedZone><Id>/hostedzone/Z1</Id></HostedZone></CreateHostedZoneResponse>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let body = XmlElement::new("CreateHostedZoneRequest")
        .with_attr("xmlns", "https://route53.amazonaws.com/doc/2011-05-05/")
        .with_leaf("Name", "example.com.")
        .with_leaf("CallerReference", "ref-2011-12-15");

    let created = client()
        .route53()
        .send(
            RequestOptions::new("hostedzone")
                .method(Method::POST)
                .base_uri(format!("{}/", server.uri()))
                .query("trace", "1")
                .xml_body(body.clone()),
        )
        .await
        .unwrap();
    assert_eq!(created.find_all("Id")[0].text(), "/hostedzone/Z1");

    let requests = server.received_requests().await.unwrap();
    let sent = XmlElement::parse(std::str::from_utf8(&requests[0].body).unwrap()).unwrap();
    assert_eq!(sent, body);
}

#[tokio::test]
async fn test_fail_channel_serialises_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(NO_SUCH_ZONE))
        .mount(&server)
        .await;

    let client = client();
    let err = run_with_callback(
        &client,
        RequestOptions::new("hostedzone/Z0000").base_uri(format!("{}/", server.uri())),
    )
    .await
    .unwrap_err();

    assert!(err.is_api());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.request_id(), Some("d4b05d0e-6b3b-11e0-b0e6-example"));

    let text = err.to_string();
    let payload: serde_json::Value =
        serde_json::from_str(text.strip_prefix("[Route53] ").unwrap()).unwrap();
    assert_eq!(payload["Error"]["Code"], "NoSuchHostedZone");
    assert_eq!(payload["RequestId"], "d4b05d0e-6b3b-11e0-b0e6-example");
}

#[tokio::test]
async fn test_transport_error() {
    let err = client()
        .route53()
        .send(RequestOptions::new("hostedzone").base_uri("http://127.0.0.1:1/"))
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_missing_callback_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LIST_HOSTED_ZONES))
        .expect(0)
        .mount(&server)
        .await;

    let err = client()
        .route53()
        .request(RequestOptions::new("hostedzone").base_uri(format!("{}/", server.uri())))
        .unwrap_err();
    assert_eq!(err.to_string(), "No success callback defined");
    assert!(server.received_requests().await.unwrap().is_empty());
}
