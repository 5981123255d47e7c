//! End-to-end scenarios for the framing engines.
//!
//! These tests pin the wire format byte-for-byte, exercise the chunk
//! reassembly path across real packet shapes, and run concurrent echo
//! traffic over TCP.

use hyperion_protocol::codec::{JsonCodec, MessageCodec, MsgPackCodec, RawCodec, Utf8Codec};
use hyperion_protocol::protocol::{
    decode_header, encode_header, wire, ChunkHeader, CHUNK_SIZE, DIRECT_MAX, FLAG_END_OF_PACKET,
    LIGHTWEIGHT_MAX, MODE_DIRECT, MODE_LIGHTWEIGHT,
};
use hyperion_protocol::transport::{TransportListener, TransportStream};
use hyperion_protocol::{ChunkedEngine, HyperionError, SmartEngine};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Read one chunked frame (header length, header, payload) off a buffer.
async fn read_frame(reader: &mut &[u8]) -> (ChunkHeader, Vec<u8>) {
    let header_len = wire::read_i32_be(reader).await.unwrap() as usize;
    let mut header_bytes = vec![0u8; header_len];
    wire::read_exact(reader, &mut header_bytes).await.unwrap();
    let header = decode_header(&header_bytes).unwrap();

    let mut payload = vec![0u8; header.data_length as usize];
    wire::read_exact(reader, &mut payload).await.unwrap();
    (header, payload)
}

/// Frame a single chunk the way a (possibly malformed) sender would.
async fn write_frame(buf: &mut Vec<u8>, header: &ChunkHeader, payload: &[u8]) {
    let header_bytes = encode_header(header).unwrap();
    wire::write_i32_be(buf, header_bytes.len() as i32)
        .await
        .unwrap();
    buf.write_all(&header_bytes).await.unwrap();
    buf.write_all(payload).await.unwrap();
}

/// S1: a tiny string travels lightweight with 3 bytes of overhead.
#[tokio::test]
async fn tiny_string_lightweight_wire() {
    let message = "Hello HyperionProtocol!".to_string();

    let mut sender = SmartEngine::new();
    let mut wire_bytes: Vec<u8> = Vec::new();
    sender
        .send(&Utf8Codec, &message, &mut wire_bytes, None)
        .await
        .unwrap();

    assert_eq!(wire_bytes.len(), 3 + 23);
    assert_eq!(&wire_bytes[..3], &[0xFF, 0x00, 0x17]);
    assert_eq!(&wire_bytes[3..], message.as_bytes());

    let mut receiver = SmartEngine::new();
    let mut reader = &wire_bytes[..];
    let out: String = receiver
        .receive(&Utf8Codec, &mut reader, None)
        .await
        .unwrap();
    assert_eq!(out, message);
}

/// S2: an empty message is a 3-byte lightweight frame.
#[tokio::test]
async fn empty_message_wire() {
    let mut sender = SmartEngine::new();
    let mut wire_bytes: Vec<u8> = Vec::new();
    sender
        .send(&RawCodec, &Vec::<u8>::new(), &mut wire_bytes, None)
        .await
        .unwrap();

    assert_eq!(wire_bytes, vec![0xFF, 0x00, 0x00]);

    let mut receiver = SmartEngine::new();
    let mut reader = &wire_bytes[..];
    let out: Vec<u8> = receiver
        .receive(&RawCodec, &mut reader, None)
        .await
        .unwrap();
    assert!(out.is_empty());
}

/// S3: exactly 1024 bytes crosses into direct mode.
#[tokio::test]
async fn direct_boundary_wire() {
    let payload = vec![0xABu8; 1024];

    let mut sender = SmartEngine::new();
    let mut wire_bytes: Vec<u8> = Vec::new();
    sender
        .send_bytes(&payload, &mut wire_bytes, None)
        .await
        .unwrap();

    assert_eq!(&wire_bytes[..5], &[0xFE, 0x00, 0x00, 0x04, 0x00]);
    assert_eq!(&wire_bytes[5..], &payload[..]);

    let mut receiver = SmartEngine::new();
    let mut reader = &wire_bytes[..];
    let out = receiver.receive_bytes(&mut reader, None).await.unwrap();
    assert_eq!(out, payload);
}

/// S4: ChunkSize + 1 bytes splits into exactly two chunks sharing one
/// identity.
#[tokio::test]
async fn two_chunk_packet_shape() {
    let payload = vec![0x5Au8; CHUNK_SIZE + 1];

    let mut sender = ChunkedEngine::new();
    let mut wire_bytes: Vec<u8> = Vec::new();
    sender
        .send_bytes(&payload, &mut wire_bytes, None)
        .await
        .unwrap();

    let mut reader = &wire_bytes[..];
    let (first, first_payload) = read_frame(&mut reader).await;
    let (second, second_payload) = read_frame(&mut reader).await;
    assert!(reader.is_empty());

    assert_eq!(first.chunk_number, 0);
    assert_eq!(first.total_chunks, 2);
    assert_eq!(first.data_length, CHUNK_SIZE as i32);
    assert_eq!(first.flags, 0);

    assert_eq!(second.chunk_number, 1);
    assert_eq!(second.total_chunks, 2);
    assert_eq!(second.data_length, 1);
    assert_eq!(second.flags, FLAG_END_OF_PACKET);

    assert_eq!(second.packet_id, first.packet_id);

    let mut reassembled = first_payload;
    reassembled.extend_from_slice(&second_payload);
    assert_eq!(reassembled, payload);
}

/// S5: a first chunk claiming position 1 fails before its payload is read.
#[tokio::test]
async fn out_of_order_chunk_rejected() {
    let header = ChunkHeader::new(Uuid::new_v4(), 1, 2, 4);

    let mut wire_bytes: Vec<u8> = Vec::new();
    write_frame(&mut wire_bytes, &header, b"data").await;

    let mut receiver = ChunkedEngine::new();
    let mut reader = &wire_bytes[..];
    let err = receiver.receive_bytes(&mut reader, None).await.unwrap_err();

    assert!(err.to_string().contains("Chunk received out of order"));
    assert_eq!(reader.len(), 4, "payload bytes were not consumed");
}

/// S6: a corrupted magic tag is rejected.
#[tokio::test]
async fn bad_magic_rejected() {
    let mut header = ChunkHeader::new(Uuid::new_v4(), 0, 1, 4);
    header.magic = "XXX".to_string();
    let header_bytes = serde_json::to_vec(&header).unwrap();

    let mut wire_bytes: Vec<u8> = Vec::new();
    wire::write_i32_be(&mut wire_bytes, header_bytes.len() as i32)
        .await
        .unwrap();
    wire_bytes.write_all(&header_bytes).await.unwrap();
    wire_bytes.write_all(b"data").await.unwrap();

    let mut receiver = ChunkedEngine::new();
    let mut reader = &wire_bytes[..];
    let err = receiver.receive_bytes(&mut reader, None).await.unwrap_err();

    assert!(err.to_string().contains("Invalid protocol magic"));
}

/// S7: ten concurrent TCP clients each get their own echo back.
#[tokio::test]
async fn concurrent_connections_no_cross_talk() {
    let listener = TransportListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let mut sessions = Vec::new();
        for _ in 0..10 {
            let (mut stream, _) = listener.accept().await.unwrap();
            sessions.push(tokio::spawn(async move {
                let mut engine = SmartEngine::new();
                let message = engine.receive_bytes(&mut stream, None).await.unwrap();
                engine.send_bytes(&message, &mut stream, None).await.unwrap();
            }));
        }
        for session in sessions {
            session.await.unwrap();
        }
    });

    let mut clients = Vec::new();
    for i in 0..10u32 {
        clients.push(tokio::spawn(async move {
            // Mix modes: some tiny, some direct-sized, some chunked.
            let len = match i % 3 {
                0 => 16,
                1 => LIGHTWEIGHT_MAX + 9,
                _ => DIRECT_MAX + 1000,
            };
            let mut message = i.to_be_bytes().to_vec();
            message.resize(len, i as u8);

            let mut stream = TransportStream::connect(addr).await.unwrap();
            let mut engine = SmartEngine::new();
            engine.send_bytes(&message, &mut stream, None).await.unwrap();
            let echo = engine.receive_bytes(&mut stream, None).await.unwrap();
            assert_eq!(echo, message);
            echo
        }));
    }

    let mut echoes = Vec::new();
    for client in clients {
        echoes.push(client.await.unwrap());
    }
    server.await.unwrap();

    // Responses are pairwise distinct: no cross-talk between connections.
    for i in 0..echoes.len() {
        for j in i + 1..echoes.len() {
            assert_ne!(echoes[i], echoes[j]);
        }
    }
}

/// Structured payloads ride the same engines as raw bytes.
#[tokio::test]
async fn typed_round_trip_with_structured_codecs() {
    #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone)]
    struct Order {
        id: u64,
        symbol: String,
        quantities: Vec<i32>,
    }

    let order = Order {
        id: 77,
        symbol: "HYP".to_string(),
        quantities: vec![10, -4, 3],
    };

    for encoded in [
        JsonCodec.encode(&order).unwrap(),
        MsgPackCodec.encode(&order).unwrap(),
    ] {
        let mut sender = SmartEngine::new();
        let mut wire_bytes: Vec<u8> = Vec::new();
        sender
            .send_bytes(&encoded, &mut wire_bytes, None)
            .await
            .unwrap();

        let mut receiver = SmartEngine::new();
        let mut reader = &wire_bytes[..];
        let payload = receiver.receive_bytes(&mut reader, None).await.unwrap();
        assert_eq!(payload, encoded);
    }

    // And the typed surface end to end.
    let mut sender = SmartEngine::new();
    let mut wire_bytes: Vec<u8> = Vec::new();
    sender
        .send(&MsgPackCodec, &order, &mut wire_bytes, None)
        .await
        .unwrap();

    let mut receiver = SmartEngine::new();
    let mut reader = &wire_bytes[..];
    let out: Order = receiver
        .receive(&MsgPackCodec, &mut reader, None)
        .await
        .unwrap();
    assert_eq!(out, order);
}

/// A plain chunked sender is understood by a smart receiver for any size.
#[tokio::test]
async fn plain_sender_smart_receiver_interop() {
    for len in [0usize, 10, DIRECT_MAX, CHUNK_SIZE + 5] {
        let payload = vec![0x7Eu8; len];

        let mut plain = ChunkedEngine::new();
        let mut wire_bytes: Vec<u8> = Vec::new();
        plain.send_bytes(&payload, &mut wire_bytes, None).await.unwrap();

        assert_ne!(wire_bytes[0], MODE_LIGHTWEIGHT);
        assert_ne!(wire_bytes[0], MODE_DIRECT);

        let mut smart = SmartEngine::new();
        let mut reader = &wire_bytes[..];
        let out = smart.receive_bytes(&mut reader, None).await.unwrap();
        assert_eq!(out, payload);
    }
}

/// Serializer failures surface as the serializer kind, not a protocol
/// violation.
#[tokio::test]
async fn serializer_failure_kind() {
    let mut sender = SmartEngine::new();
    let mut wire_bytes: Vec<u8> = Vec::new();
    sender
        .send_bytes(b"\xFF\xFE not utf8", &mut wire_bytes, None)
        .await
        .unwrap();

    let mut receiver = SmartEngine::new();
    let mut reader = &wire_bytes[..];
    let err = receiver
        .receive::<String, _, _>(&Utf8Codec, &mut reader, None)
        .await
        .unwrap_err();
    assert!(matches!(err, HyperionError::Serializer(_)));
}
