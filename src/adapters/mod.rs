//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements        | Connects to                    |
//! |----------------|-------------------|--------------------------------|
//! | `event_source` | (pure codec)      | state tokens ↔ typed events    |
//! | `mqtt`         | Transport         | ESP-IDF MQTT client / sim      |
//! | `display`      | DisplayPort       | any embedded-graphics target   |
//! | `hardware`     | Display+Strip+Beep| LCD, SK6812 strip, speaker     |
//! | `log_sink`     | EventSink         | Serial log output              |
//! | `nvs`          | ConfigPort        | NVS / in-memory store          |
//! | `wifi`         | (station link)    | ESP-IDF WiFi STA / sim         |
//! | `time`         | (monotonic clock) | esp_timer / std::time          |
//! | `device_id`    | (identity)        | eFuse MAC                      |

pub mod device_id;
pub mod display;
pub mod event_source;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod nvs;
pub mod time;
pub mod wifi;
