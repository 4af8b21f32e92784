//! Signing and verification benchmarks
//!
//! Every gateway call pays for one RSA2 signature on the way out and one
//! verification on the way back, so these dominate client-side latency.
//!
//! Run with: `cargo bench --bench signing_benchmarks`

use alipay_lib::envelope::build_request_at;
use alipay_lib::trade::QueryParam;
use alipay_lib::{canonicalize, Credentials, EnvelopeOptions, GatewayResponse, Signer, Verifier};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

const APP_PRIVATE_KEY: &str = include_str!("../tests/fixtures/app_private_key.pem");
const GATEWAY_PRIVATE_KEY: &str = include_str!("../tests/fixtures/gateway_private_key.pem");
const GATEWAY_PUBLIC_KEY: &str = include_str!("../tests/fixtures/gateway_public_key.pem");

const FRAGMENT: &str = r#"{"code":"10000","msg":"Success","trade_no":"2024010122001400000000000001","out_trade_no":"20240101000001","trade_status":"TRADE_SUCCESS","total_amount":"88.88"}"#;

fn bench_canonicalize(c: &mut Criterion) {
    let fields: Vec<(String, String)> = (0..12)
        .map(|i| (format!("field_{:02}", 11 - i), format!("value {}", i)))
        .collect();

    c.bench_function("canonicalize_12_fields", |b| {
        b.iter(|| {
            let canonical = canonicalize(
                black_box(&fields)
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
            black_box(canonical)
        })
    });
}

fn bench_rsa2_sign(c: &mut Criterion) {
    let signer = Signer::from_pem(APP_PRIVATE_KEY).unwrap();
    let message = b"app_id=2014072300007148&biz_content={\"out_trade_no\":\"20240101000001\"}&charset=utf-8&method=alipay.trade.query&sign_type=RSA2&timestamp=2024-01-01 00:00:00&version=1.0";

    c.bench_function("rsa2_sign", |b| {
        b.iter(|| {
            let sign = signer.sign(black_box(message)).unwrap();
            black_box(sign)
        })
    });
}

fn bench_rsa2_verify(c: &mut Criterion) {
    let signer = Signer::from_pem(GATEWAY_PRIVATE_KEY).unwrap();
    let verifier = Verifier::from_pem(GATEWAY_PUBLIC_KEY).unwrap();
    let sign = signer.sign(FRAGMENT.as_bytes()).unwrap();

    c.bench_function("rsa2_verify", |b| {
        b.iter(|| {
            let result = verifier.verify_base64(black_box(FRAGMENT.as_bytes()), black_box(&sign));
            black_box(result)
        })
    });
}

fn bench_build_request(c: &mut Criterion) {
    let credentials =
        Credentials::from_pem("2014072300007148", APP_PRIVATE_KEY, GATEWAY_PUBLIC_KEY).unwrap();
    let param = QueryParam::by_out_trade_no("20240101000001");
    let options = EnvelopeOptions::new();

    c.bench_function("build_signed_request", |b| {
        b.iter(|| {
            let request = build_request_at(
                &credentials,
                "alipay.trade.query",
                black_box(&param),
                &options,
                "2024-01-01 00:00:00".to_string(),
            )
            .unwrap();
            black_box(request)
        })
    });
}

fn bench_verify_response(c: &mut Criterion) {
    let signer = Signer::from_pem(GATEWAY_PRIVATE_KEY).unwrap();
    let verifier = Verifier::from_pem(GATEWAY_PUBLIC_KEY).unwrap();
    let sign = signer.sign(FRAGMENT.as_bytes()).unwrap();
    let body = format!(
        r#"{{"alipay_trade_query_response":{},"sign":"{}"}}"#,
        FRAGMENT, sign
    );

    let mut group = c.benchmark_group("gateway_response");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("extract_and_verify", |b| {
        b.iter(|| {
            let response = GatewayResponse::from_body(200, black_box(body.as_bytes()), &verifier);
            black_box(response)
        })
    });
    group.finish();
}

criterion_group!(
    signing_benches,
    bench_canonicalize,
    bench_rsa2_sign,
    bench_rsa2_verify,
    bench_build_request,
    bench_verify_response,
);

criterion_main!(signing_benches);
