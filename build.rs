use std::env;

const DEFAULT_CPU_HZ: &str = "16000000";

fn main() {
    // CPU clock used for bit-rate and baud calculations
    let freq = env::var("TWI_LINK_CPU_HZ").unwrap_or_else(|_| DEFAULT_CPU_HZ.to_string());
    if freq.parse::<u32>().map_or(true, |hz| hz == 0) {
        panic!("TWI_LINK_CPU_HZ must be a positive integer in Hz, got {:?}", freq);
    }
    println!("cargo:rustc-env=MCU_FREQ_HZ={}", freq);
    println!("cargo:rerun-if-env-changed=TWI_LINK_CPU_HZ");
    println!("cargo:rerun-if-changed=build.rs");

    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("avr") {
        println!("cargo:warning=Building for ATmega328P at {} Hz", freq);
    }
}
