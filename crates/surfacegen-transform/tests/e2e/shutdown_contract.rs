//! The generated `close` never lets a close failure escape and always
//! leaves the client marked closed.

use surfacegen_ast::{ClassDefinition, MethodDefinition, Statement};
use surfacegen_transform::overrides::shutdown::{CHANNEL_WARNING, HTTP_WARNING};
use surfacegen_transform::*;

fn generated_close(original: MethodDefinition) -> MethodDefinition {
    let input = ClassDefinition::new("QdrantRemote").with_method(original);
    let out = AsyncSurfaceGenerator::new(TransformationPolicy::new())
        .generate(&input)
        .unwrap();
    out.class.method("close").cloned().unwrap()
}

#[test]
fn every_close_raising_still_ends_closed() {
    let close = generated_close(MethodDefinition::new("close").with_statement(Statement::Pass));
    let client = SimulatedClient::healthy()
        .with_channel(ChannelState::Open(CloseOutcome::raise("AttributeError")))
        .with_http(CloseOutcome::raise("RemoteProtocolError"));

    let report = ShutdownSimulator::new(client).run(&close, Some(2.0)).unwrap();

    assert!(report.closed);
    assert!(report.escaped.is_none());
    assert!(!report.channel_closed);
    assert!(!report.http_closed);
    assert_eq!(
        report.warnings,
        vec![CHANNEL_WARNING.to_string(), HTTP_WARNING.to_string()]
    );
}

#[test]
fn runtime_state_error_on_channel_is_silent() {
    let close = generated_close(MethodDefinition::new("close"));
    let client = SimulatedClient::healthy()
        .with_channel(ChannelState::Open(CloseOutcome::raise("RuntimeError")))
        .with_http(CloseOutcome::raise("ConnectError"));

    let report = ShutdownSimulator::new(client).run(&close, None).unwrap();
    assert!(report.is_fail_soft());
    assert_eq!(report.warnings, vec![HTTP_WARNING.to_string()]);
}

#[test]
fn grace_period_is_passed_through() {
    let close = generated_close(MethodDefinition::new("close"));
    let report = ShutdownSimulator::new(SimulatedClient::healthy())
        .run(&close, Some(0.25))
        .unwrap();
    assert!(report.channel_closed);
    assert!(report.http_closed);
    assert_eq!(report.channel_grace, Some(0.25));
}

#[test]
fn client_without_channel_only_closes_http() {
    let close = generated_close(MethodDefinition::new("close"));
    for channel in [ChannelState::Absent, ChannelState::Unset] {
        let client = SimulatedClient::healthy().with_channel(channel);
        let report = ShutdownSimulator::new(client).run(&close, None).unwrap();
        assert!(!report.channel_closed);
        assert!(report.http_closed);
        assert!(report.is_fail_soft());
    }
}

#[test]
fn outcome_matrix_is_fail_soft() {
    let close = generated_close(MethodDefinition::new("close"));
    let channels = [
        ChannelState::Absent,
        ChannelState::Unset,
        ChannelState::Open(CloseOutcome::Succeed),
        ChannelState::Open(CloseOutcome::raise("AttributeError")),
        ChannelState::Open(CloseOutcome::raise("RuntimeError")),
    ];
    let https = [
        CloseOutcome::Succeed,
        CloseOutcome::raise("ConnectError"),
        CloseOutcome::raise("RuntimeError"),
    ];
    for channel in &channels {
        for http in &https {
            let client = SimulatedClient {
                channel: channel.clone(),
                http: http.clone(),
            };
            let report = ShutdownSimulator::new(client).run(&close, None).unwrap();
            assert!(
                report.is_fail_soft(),
                "channel={:?} http={:?} report={:?}",
                channel,
                http,
                report
            );
        }
    }
}
