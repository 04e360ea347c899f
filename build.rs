fn main() {
    // ESP-IDF link arguments are only needed for the firmware binaries.
    // Host builds (tests, docs) skip the toolchain probe entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
