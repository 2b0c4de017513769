use std::time::{Duration, SystemTime};

use anyhow::Result;
use castline_core::{
    CastContext, Cancelled, ChannelConfig, Message, MessageBody, MessageVariant, MessageVersion,
};
use castline_services::CastCause;

use crate::*;

#[tokio::test]
async fn test_cast_to_known_peer() -> Result<()> {
    let mut node = TestNode::new(&ChannelConfig::default());
    node.resolver.insert(peer_id(1), Entry::Known(address(4001)));

    node.caster
        .cast(&CastContext::background(), &peer_id(1), MessageBody::from("hello"))
        .await?;

    let wire = single(node.drain_wire())?;
    assert_eq!(wire.to, address(4001));
    assert_eq!(wire.message.variant, MessageVariant::Cast);
    assert_eq!(wire.message.version, MessageVersion::V1);
    assert_eq!(wire.message.body.as_bytes(), b"hello");
    Ok(())
}

#[tokio::test]
async fn test_cast_to_absent_peer() {
    let mut node = TestNode::new(&ChannelConfig::default());
    node.resolver.insert(peer_id(2), Entry::Absent);

    let err = node
        .caster
        .cast(&CastContext::background(), &peer_id(2), MessageBody::from("x"))
        .await
        .unwrap_err();

    assert_eq!(err.peer_id(), &peer_id(2));
    assert!(matches!(err.cause(), CastCause::NoAddress));
    assert!(node.drain_wire().is_empty());
}

#[tokio::test]
async fn test_cast_to_unlisted_peer_is_absent() {
    let mut node = TestNode::new(&ChannelConfig::default());

    let err = node
        .caster
        .cast(&CastContext::background(), &peer_id(77), MessageBody::from("x"))
        .await
        .unwrap_err();

    assert!(matches!(err.cause(), CastCause::NoAddress));
    assert!(node.drain_wire().is_empty());
}

#[tokio::test]
async fn test_cast_resolver_failure() {
    let mut node = TestNode::new(&ChannelConfig::default());
    node.resolver
        .insert(peer_id(3), Entry::Failing("routing table empty".into()));

    let err = node
        .caster
        .cast(&CastContext::background(), &peer_id(3), MessageBody::from("x"))
        .await
        .unwrap_err();

    assert_eq!(err.peer_id(), &peer_id(3));
    assert!(err.to_string().ends_with("routing table empty"));
    assert!(node.drain_wire().is_empty());
}

/// Context already cancelled and nobody draining the transport queue.
#[tokio::test]
async fn test_cast_with_cancelled_context() {
    let mut node = TestNode::new(&ChannelConfig::default());
    node.resolver.insert(peer_id(1), Entry::Known(address(4001)));

    let ctx = CastContext::background();
    ctx.cancel();

    let err = node
        .caster
        .cast(&ctx, &peer_id(1), MessageBody::from("hello"))
        .await
        .unwrap_err();

    assert_eq!(err.peer_id(), &peer_id(1));
    assert_eq!(err.cancelled(), Some(Cancelled::Canceled));
    assert!(node.drain_wire().is_empty());
}

#[tokio::test]
async fn test_cast_times_out_behind_stalled_transport() -> Result<()> {
    let mut node = TestNode::new(&ChannelConfig::default());
    node.resolver.insert(peer_id(1), Entry::Known(address(4001)));

    node.caster
        .cast(&CastContext::background(), &peer_id(1), MessageBody::from("a"))
        .await?;

    let ctx = CastContext::background().with_timeout(Duration::from_millis(25));
    let err = node
        .caster
        .cast(&ctx, &peer_id(1), MessageBody::from("b"))
        .await
        .unwrap_err();
    assert_eq!(err.cancelled(), Some(Cancelled::DeadlineExceeded));

    let wire = single(node.drain_wire())?;
    assert_eq!(wire.message.body.as_bytes(), b"a");
    Ok(())
}

#[tokio::test]
async fn test_accept_cast_raises_event() -> Result<()> {
    let mut node = TestNode::new(&ChannelConfig::default());
    let start = SystemTime::now();

    node.caster
        .accept_cast(
            &CastContext::background(),
            Message::cast(MessageBody::from("ping")),
        )
        .await?;

    let event = single(node.drain_events())?;
    assert_eq!(event.message.as_bytes(), b"ping");
    assert!(event.time >= start);
    assert!(node.drain_wire().is_empty(), "accepted casts are never forwarded");
    Ok(())
}

#[tokio::test]
async fn test_accept_cast_cancelled_names_local_peer() {
    let mut node = TestNode::new(&ChannelConfig::default());
    let ctx = CastContext::background();
    ctx.cancel();

    let err = node
        .caster
        .accept_cast(&ctx, Message::cast(MessageBody::from("ping")))
        .await
        .unwrap_err();

    assert_eq!(err.peer_id(), &peer_id(0));
    assert!(err.is_cancelled());
    assert!(node.drain_events().is_empty());
}

#[tokio::test]
async fn test_accept_cast_after_consumer_gone() {
    let node = TestNode::new(&ChannelConfig::default());
    let TestNode {
        caster, events_rx, ..
    } = node;
    drop(events_rx);

    let err = caster
        .accept_cast(
            &CastContext::background(),
            Message::cast(MessageBody::from("late")),
        )
        .await
        .unwrap_err();

    assert!(matches!(err.cause(), CastCause::ChannelClosed));
    assert_eq!(err.peer_id(), &peer_id(0));
}
