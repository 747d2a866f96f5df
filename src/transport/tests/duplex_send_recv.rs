//! End-to-end scenarios S1 and S4 from spec.md §8, driven over real TCP
//! loopback connections with real threads (no async test runtime needed;
//! the transport is thread-based, not tokio-based).

use std::{
	net::{TcpListener, TcpStream},
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc, Mutex,
	},
	thread,
	time::Duration,
};

use transerv_transport::{channel::Channel, request_client::RequestClient, request_server::RequestServer};

const MSG_A: i32 = 0;
const MSG_B: i32 = 1;

fn loopback_pair() -> (TcpStream, TcpStream) {
	let listener = TcpListener::bind("127.0.0.1:0").unwrap();
	let addr = listener.local_addr().unwrap();
	let client = TcpStream::connect(addr).unwrap();
	let (server, _) = listener.accept().unwrap();
	(client, server)
}

/// S1: one `request_client` driving one `request_server` through a fixed
/// sequence; the server must handle exactly 4 requests in that order.
#[test]
fn s1_transport_one_way() {
	let (client_stream, server_stream) = loopback_pair();
	let client_channel = Channel::from_stream("client".into(), client_stream).unwrap();
	let server_channel = Channel::from_stream("server".into(), server_stream).unwrap();

	let client = RequestClient::new(Arc::new(Mutex::new(client_channel)));

	let order = Arc::new(Mutex::new(Vec::new()));
	let server = Arc::new(RequestServer::new(Arc::new(Mutex::new(server_channel)), || {}));

	let order_a = Arc::clone(&order);
	server.register(
		MSG_A,
		Box::new(move |body| {
			let value = i32::from_be_bytes(body.try_into().unwrap());
			assert_eq!(value, 0);
			order_a.lock().unwrap().push((MSG_A, value));
		}),
	);

	let order_b = Arc::clone(&order);
	server.register(
		MSG_B,
		Box::new(move |body| {
			let value = i32::from_be_bytes(body.try_into().unwrap());
			assert_eq!(value, 1);
			order_b.lock().unwrap().push((MSG_B, value));
		}),
	);

	server.start_thread();

	client.send(MSG_A, &0_i32.to_be_bytes()).unwrap();
	client.send(MSG_B, &1_i32.to_be_bytes()).unwrap();
	client.send(MSG_B, &1_i32.to_be_bytes()).unwrap();
	client.send(MSG_A, &0_i32.to_be_bytes()).unwrap();

	// give the receiver thread a chance to drain; deterministic since a
	// single receiver processes in wire order.
	for _ in 0..100 {
		if order.lock().unwrap().len() == 4 {
			break;
		}
		thread::sleep(Duration::from_millis(10));
	}

	server.stop_thread();

	assert_eq!(*order.lock().unwrap(), vec![
		(MSG_A, 0),
		(MSG_B, 1),
		(MSG_B, 1),
		(MSG_A, 0),
	]);
}

/// S4 (abridged): many concurrent `send_recv` calls interleaved with many
/// concurrent `push` calls; every `send_recv` must see the peer's `+1`
/// response and every push must be observed.
#[test]
fn s4_send_recv_and_push_interleaved() {
	use transerv_transport::duplex::RequestSyncClientServer;

	const SEND_RECV_ID: i32 = 10;
	const PUSH_ID: i32 = 11;
	const N: i32 = 200;

	let (a_stream, b_stream) = loopback_pair();
	let a_channel = Channel::from_stream("a".into(), a_stream).unwrap();
	let b_channel = Channel::from_stream("b".into(), b_stream).unwrap();

	let endpoint_a = RequestSyncClientServer::new(a_channel, 16, || {});
	let endpoint_b = RequestSyncClientServer::new(b_channel, 16, || {});

	// B echoes SEND_RECV_ID requests back incremented by one, and counts
	// PUSH_ID arrivals.
	let push_count = Arc::new(AtomicUsize::new(0));
	let push_count_b = Arc::clone(&push_count);
	let endpoint_b_for_handler = Arc::clone(&endpoint_b);
	endpoint_b.on(SEND_RECV_ID, move |req| {
		let value = i32::from_le_bytes(req.payload.try_into().unwrap());
		endpoint_b_for_handler.respond(transerv_transport::SequencedPayload {
			rsn: req.rsn,
			payload: (value + 1).to_le_bytes().to_vec(),
		});
	});
	endpoint_b.on(PUSH_ID, move |_req| {
		push_count_b.fetch_add(1, Ordering::Relaxed);
	});

	endpoint_a.start();
	endpoint_b.start();

	let endpoint_a_for_threads = Arc::clone(&endpoint_a);
	let send_recv_thread = thread::spawn(move || {
		for i in 0..N {
			let response = endpoint_a_for_threads
				.send_recv(SEND_RECV_ID, &i.to_le_bytes())
				.unwrap();
			let value = i32::from_le_bytes(response.try_into().unwrap());
			assert_eq!(value, i + 1);
		}
	});

	let endpoint_a_for_push = Arc::clone(&endpoint_a);
	let push_thread = thread::spawn(move || {
		for i in 0..N {
			endpoint_a_for_push.push(PUSH_ID, &i.to_le_bytes());
		}
	});

	send_recv_thread.join().unwrap();
	push_thread.join().unwrap();

	for _ in 0..200 {
		if push_count.load(Ordering::Relaxed) == N as usize {
			break;
		}
		thread::sleep(Duration::from_millis(10));
	}

	assert_eq!(push_count.load(Ordering::Relaxed), N as usize);

	endpoint_a.stop();
	endpoint_b.stop();
}
