//! Property tests for pipe framing and the outbound queue

use openhandheld_ipc::prelude::*;
use openhandheld_ipc::{FrameHeader, ControllerConnect};
use openhandheld_input::{ControllerState, GyroState};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

fn any_message() -> impl Strategy<Value = PipeMessage> {
    prop_oneof![
        Just(PipeMessage::ServerPing),
        Just(PipeMessage::ForceShutdown),
        Just(PipeMessage::ClientControllerDisconnect),
        any::<i32>().prop_map(PipeMessage::ClientOverlay),
        "[a-zA-Z]{0,12}".prop_map(PipeMessage::ClientNavigated),
        (any::<u8>(), any::<u8>()).prop_map(|(large_motor, small_motor)| {
            PipeMessage::ServerVibration(Vibration { large_motor, small_motor })
        }),
        "[a-z ]{0,16}".prop_map(|name| PipeMessage::ClientControllerConnect(ControllerConnect {
            name,
            ..ControllerConnect::default()
        })),
        Just(PipeMessage::ServerSensor(Sensor::default())),
        Just(PipeMessage::ClientInputs(ControllerState::default())),
        Just(PipeMessage::ClientMovements(GyroState::default())),
        (0u8..=16, 0u8..=16).prop_map(|(x, y)| PipeMessage::ClientCursor(Cursor {
            x: f64::from(x) / 16.0,
            y: f64::from(y) / 16.0,
            ..Cursor::default()
        })),
    ]
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    #[test]
    fn prop_disconnected_queue_keeps_only_durable_messages(
        messages in proptest::collection::vec(any_message(), 0..40),
    ) {
        let (local, _remote) = ChannelTransport::pair();
        let mut client = PipeClient::new(local);

        for message in messages {
            let before = client.queue_len();
            let droppable = message.is_droppable();
            prop_assert!(client.send(message).is_ok());
            let expected = if droppable { before } else { before + 1 };
            prop_assert_eq!(client.queue_len(), expected);
        }
    }

    #[test]
    fn prop_queued_messages_arrive_in_send_order(
        messages in proptest::collection::vec(any_message(), 0..40),
        after in proptest::collection::vec(any_message(), 0..10),
    ) {
        let (local, remote) = ChannelTransport::pair();
        let mut client = PipeClient::new(local);
        let mut peer = PipeClient::new(remote);

        let mut expected: Vec<PipeMessage> = Vec::new();
        for message in messages {
            if !message.is_droppable() {
                expected.push(message.clone());
            }
            prop_assert!(client.send(message).is_ok());
        }

        client.on_message(&PipeMessage::ServerPing);
        prop_assert!(client.flush().is_ok());
        for message in after {
            expected.push(message.clone());
            prop_assert!(client.send(message).is_ok());
        }

        let received = peer.poll().unwrap_or_default();
        prop_assert_eq!(received, expected);
    }

    #[test]
    fn prop_decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        if let Ok((header, message)) = MessageCodec::new().decode(&data) {
            prop_assert_eq!(header.code, message.code().as_u16());
        }
    }
}

#[test]
fn sensor_is_dropped_and_ping_is_queued_first() -> IpcResult<()> {
    let (local, remote) = ChannelTransport::pair();
    let mut client = PipeClient::new(local);
    let mut peer = PipeClient::new(remote);

    client.send(PipeMessage::ServerSensor(Sensor::default()))?;
    assert_eq!(client.queue_len(), 0);

    client.send(PipeMessage::ServerPing)?;
    assert_eq!(client.queue_len(), 1);
    client.send(PipeMessage::ClientOverlay(1))?;

    client.on_message(&PipeMessage::ServerPing);
    client.flush()?;

    assert_eq!(peer.poll()?, vec![PipeMessage::ServerPing, PipeMessage::ClientOverlay(1)]);
    Ok(())
}

#[quickcheck]
fn header_fields_survive_encoding(code: u16, payload_len: u32, sequence: u32, flags: u16) -> bool {
    let header = FrameHeader {
        code,
        payload_len,
        sequence,
        flags,
    };
    FrameHeader::decode(&header.encode()).ok() == Some(header)
}
