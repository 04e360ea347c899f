//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements                         | Connects to                  |
//! |-------------|------------------------------------|------------------------------|
//! | `gpio`      | ButtonPort, ContactSensor          | embedded-hal input pins      |
//! |             | LightPort                          | embedded-hal PWM channel     |
//! | `hardware`  | MainBoard (all main-unit ports)    | DS3231, HD44780, LEDC, UART  |
//! |             | RemoteBoard                        | force sensor, LED bar, UART  |
//! | `log_sink`  | EventSink                          | Serial log output            |

pub mod gpio;
pub mod hardware;
pub mod log_sink;
