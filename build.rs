fn main() {
    // Emits the ESP-IDF link/env configuration when cross-compiling for the
    // panel. On host targets (tests) there is no sysenv and this is a no-op.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
