//! MQTT transport adapter.
//!
//! Implements [`Transport`] over the ESP-IDF MQTT client. Connection-time
//! configuration carries the availability contract: an LWT of `offline`
//! (retained) on the status topic, with a retained `online` published after
//! every (re)connect. Inbound messages are buffered by the client task and
//! drained non-blocking from the tick loop.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps `EspMqttClient` (which reconnects internally; the
//! tick loop only spaces its `reconnect()` probes by the configured delay).
//! On host/test: an in-memory simulation with injectable inbound messages
//! and a published-message record.

use log::info;

use crate::app::ports::{InboundMessage, Transport};
use crate::config::PanelConfig;
use crate::error::TransportError;

pub const ONLINE_PAYLOAD: &[u8] = b"online";
pub const OFFLINE_PAYLOAD: &[u8] = b"offline";

/// Cap on buffered inbound messages; beyond this the oldest are dropped.
const INBOUND_QUEUE_CAP: usize = 32;

#[cfg(target_os = "espidf")]
mod esp {
    use super::*;
    use log::warn;

    use esp_idf_svc::mqtt::client::{
        EspMqttClient, EventPayload, LwtConfiguration, MqttClientConfiguration, QoS,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Shared with the client's event callback (runs on the MQTT task).
    pub(super) struct Shared {
        pub connected: AtomicBool,
        pub session_fresh: AtomicBool,
        pub queue: Mutex<VecDeque<InboundMessage>>,
    }

    pub struct MqttTransport {
        client: EspMqttClient<'static>,
        shared: std::sync::Arc<Shared>,
        state_topic: String,
        status_topic: String,
    }

    impl MqttTransport {
        pub fn new(config: &PanelConfig, client_id: &str) -> Result<Self, TransportError> {
            let url = format!("mqtt://{}:{}", config.mqtt_host, config.mqtt_port);
            let mqtt_conf = MqttClientConfiguration {
                client_id: Some(client_id),
                username: config.mqtt_username.as_deref(),
                password: config.mqtt_password.as_deref(),
                keep_alive_interval: Some(std::time::Duration::from_secs(u64::from(
                    config.keep_alive_secs,
                ))),
                lwt: Some(LwtConfiguration {
                    topic: &config.status_topic,
                    payload: OFFLINE_PAYLOAD,
                    qos: QoS::AtMostOnce,
                    retain: true,
                }),
                ..Default::default()
            };

            let shared = std::sync::Arc::new(Shared {
                connected: AtomicBool::new(false),
                session_fresh: AtomicBool::new(false),
                queue: Mutex::new(VecDeque::new()),
            });
            let cb_shared = shared.clone();

            let client = EspMqttClient::new_cb(&url, &mqtt_conf, move |event| {
                match event.payload() {
                    EventPayload::Connected(_) => {
                        info!("MQTT: connected");
                        cb_shared.session_fresh.store(true, Ordering::Release);
                        cb_shared.connected.store(true, Ordering::Release);
                    }
                    EventPayload::Disconnected => {
                        warn!("MQTT: disconnected");
                        cb_shared.connected.store(false, Ordering::Release);
                    }
                    EventPayload::Received { topic, data, .. } => {
                        if let (Some(topic), Ok(mut queue)) = (topic, cb_shared.queue.lock()) {
                            if queue.len() >= INBOUND_QUEUE_CAP {
                                queue.pop_front();
                            }
                            queue.push_back(InboundMessage {
                                topic: topic.to_string(),
                                payload: data.to_vec(),
                            });
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|_| TransportError::ConnectFailed)?;

            Ok(Self {
                client,
                shared,
                state_topic: config.state_topic.clone(),
                status_topic: config.status_topic.clone(),
            })
        }

        /// Subscribe + announce availability once per broker session.
        /// Sessions are not persistent, so this re-runs after every
        /// reconnect.
        fn refresh_session(&mut self) -> Result<(), TransportError> {
            if !self.shared.session_fresh.swap(false, Ordering::AcqRel) {
                return Ok(());
            }
            self.client
                .subscribe(&self.state_topic, QoS::AtMostOnce)
                .map_err(|_| TransportError::SubscribeFailed)?;
            self.client
                .enqueue(&self.status_topic, QoS::AtMostOnce, true, ONLINE_PAYLOAD)
                .map_err(|_| TransportError::PublishFailed)?;
            info!("MQTT: subscribed to {}", self.state_topic);
            Ok(())
        }
    }

    impl Transport for MqttTransport {
        fn poll_incoming(&mut self) -> Option<InboundMessage> {
            if let Err(e) = self.refresh_session() {
                warn!("MQTT: session refresh failed: {e}");
            }
            self.shared.queue.lock().ok().and_then(|mut q| q.pop_front())
        }

        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
            if !self.is_connected() {
                return Err(TransportError::NotConnected);
            }
            self.client
                .enqueue(topic, QoS::AtMostOnce, false, payload)
                .map(|_| ())
                .map_err(|_| TransportError::PublishFailed)
        }

        fn is_connected(&self) -> bool {
            self.shared.connected.load(Ordering::Acquire)
        }

        fn reconnect(&mut self) -> Result<(), TransportError> {
            // The ESP-IDF client reconnects on its own task; one probe per
            // configured delay is enough here.
            if self.is_connected() {
                self.refresh_session()
            } else {
                Err(TransportError::NotConnected)
            }
        }
    }
}

#[cfg(target_os = "espidf")]
pub use esp::MqttTransport;

#[cfg(not(target_os = "espidf"))]
mod sim {
    use super::*;
    use std::collections::VecDeque;

    /// Simulation backend: a loopback broker good enough for host tests.
    pub struct MqttTransport {
        connected: bool,
        incoming: VecDeque<InboundMessage>,
        /// Every successfully published (topic, payload) pair, in order.
        pub published: Vec<(String, Vec<u8>)>,
        state_topic: String,
        status_topic: String,
    }

    impl MqttTransport {
        pub fn new(config: &PanelConfig, _client_id: &str) -> Result<Self, TransportError> {
            info!("MQTT(sim): loopback transport for {}", config.mqtt_host);
            Ok(Self {
                connected: false,
                incoming: VecDeque::new(),
                published: Vec::new(),
                state_topic: config.state_topic.clone(),
                status_topic: config.status_topic.clone(),
            })
        }

        /// Queue an inbound message as if the broker delivered it.
        pub fn inject_incoming(&mut self, topic: &str, payload: &[u8]) {
            if self.incoming.len() >= INBOUND_QUEUE_CAP {
                self.incoming.pop_front();
            }
            self.incoming.push_back(InboundMessage {
                topic: topic.to_string(),
                payload: payload.to_vec(),
            });
        }

        /// Simulate a broker drop.
        pub fn set_offline(&mut self) {
            self.connected = false;
        }

        pub fn state_topic(&self) -> &str {
            &self.state_topic
        }
    }

    impl Transport for MqttTransport {
        fn poll_incoming(&mut self) -> Option<InboundMessage> {
            if !self.connected {
                return None;
            }
            self.incoming.pop_front()
        }

        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            self.published.push((topic.to_string(), payload.to_vec()));
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn reconnect(&mut self) -> Result<(), TransportError> {
            self.connected = true;
            // Same availability contract as the device: retained online.
            let status = self.status_topic.clone();
            self.published.push((status, ONLINE_PAYLOAD.to_vec()));
            Ok(())
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub use sim::MqttTransport;
