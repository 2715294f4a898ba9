//! Register region write-through and side-effect tests

use super::harness;
use crate::apu::registers::{
    PulseId, NUM_REGS, PULSE1_SWEEP, PULSE1_TIMER_HIGH, PULSE2_SWEEP, PULSE2_TIMER_HIGH,
};
use crate::bus::MemoryMappedDevice;

#[test]
fn test_every_write_stores_raw_byte() {
    let (mut apu, _sink, _irq) = harness();

    // Write-through is bit-exact for every slot, including the ones with
    // side effects and the triangle/noise/DMC slots with none
    for offset in 0..NUM_REGS as u16 {
        let value = 0xC0 | offset as u8;
        apu.write_register(offset, value);
        assert_eq!(apu.registers().raw(offset), value);
    }
}

#[test]
fn test_timer_high_loads_length_counter_when_enabled() {
    let (mut apu, _sink, _irq) = harness();

    apu.write_control(0x01);
    apu.write_register(PULSE1_TIMER_HIGH, 0x08); // length load index 1

    assert_eq!(apu.pulse1.length.counter, 254);
}

#[test]
fn test_timer_high_skips_length_load_when_disabled() {
    let (mut apu, _sink, _irq) = harness();

    apu.write_register(PULSE1_TIMER_HIGH, 0x08);

    assert_eq!(apu.pulse1.length.counter, 0);
}

#[test]
fn test_timer_high_always_restarts_envelope() {
    let (mut apu, _sink, _irq) = harness();

    // Even with the channel disabled, the envelope start flag is set
    apu.write_register(PULSE2_TIMER_HIGH, 0x00);

    assert!(apu.pulse2.envelope.start);
    assert!(!apu.pulse1.envelope.start);
}

#[test]
fn test_sweep_write_arms_reload() {
    let (mut apu, _sink, _irq) = harness();

    apu.write_register(PULSE1_SWEEP, 0x00);
    assert!(apu.pulse1.sweep.reload);
    assert!(!apu.pulse2.sweep.reload);

    apu.write_register(PULSE2_SWEEP, 0xFF);
    assert!(apu.pulse2.sweep.reload);
}

#[test]
fn test_length_table_lookup() {
    let (mut apu, _sink, _irq) = harness();
    apu.write_control(0x01);

    // Spot-check entries across the 32-entry table
    let cases = [(0u8, 10u8), (1, 254), (2, 20), (16, 12), (31, 30)];
    for (index, expected) in cases {
        apu.write_register(PULSE1_TIMER_HIGH, index << 3);
        assert_eq!(apu.pulse1.length.counter, expected, "index {}", index);
    }
}

#[test]
fn test_control_disable_zeroes_length_immediately() {
    let (mut apu, _sink, _irq) = harness();

    apu.write_control(0x03);
    apu.write_register(PULSE1_TIMER_HIGH, 0x08);
    apu.write_register(PULSE2_TIMER_HIGH, 0x08);
    assert_eq!(apu.pulse1.length.counter, 254);
    assert_eq!(apu.pulse2.length.counter, 254);

    // Clearing pulse 1's enable bit zeroes only its counter
    apu.write_control(0x02);
    assert_eq!(apu.pulse1.length.counter, 0);
    assert_eq!(apu.pulse2.length.counter, 254);
}

#[test]
fn test_status_read_clears_frame_interrupt() {
    let (mut apu, _sink, irq) = harness();

    // Run a full 4-step sequence to set the frame interrupt
    apu.write_sequencer(0x00);
    for _ in 0..4 {
        apu.sequencer_tick();
    }
    assert!(apu.registers().frame_interrupt());
    assert!(irq.is_raised());

    let status = apu.read_status();
    assert_ne!(status & 0x40, 0);

    // The flag and the line drop as the read's side effect
    assert!(!apu.registers().frame_interrupt());
    assert!(!irq.is_raised());
    assert_eq!(apu.read_status() & 0x40, 0);
}

#[test]
fn test_sequencer_write_resets_step() {
    let (mut apu, _sink, _irq) = harness();

    apu.sequencer_tick();
    apu.sequencer_tick();
    assert_eq!(apu.sequencer.step(), 2);

    apu.write_sequencer(0x80);
    assert_eq!(apu.sequencer.step(), 0);
    assert!(apu.take_sequencer_realign());
    assert!(!apu.take_sequencer_realign());
}

#[test]
fn test_inhibit_write_clears_frame_interrupt() {
    let (mut apu, _sink, irq) = harness();

    apu.write_sequencer(0x00);
    for _ in 0..4 {
        apu.sequencer_tick();
    }
    assert!(irq.is_raised());

    apu.write_sequencer(0x40);
    assert!(!apu.registers().frame_interrupt());
    assert!(!irq.is_raised());
}

#[test]
fn test_bus_window_decode() {
    let (mut apu, _sink, _irq) = harness();

    // Main region through the bus window
    apu.write(0x4000, 0xBF);
    assert_eq!(apu.registers().raw(0x00), 0xBF);
    apu.write(0x4006, 0x55);
    assert_eq!(apu.registers().raw(0x06), 0x55);

    // Control/status
    apu.write(0x4015, 0x03);
    assert!(apu.registers().control().pulse_enabled(PulseId::Pulse1));

    // Sequencer
    apu.write(0x4017, 0x80);
    assert_eq!(apu.registers().sequencer().0, 0x80);

    // Write-only addresses read as zero
    assert_eq!(apu.read(0x4000), 0);
    assert_eq!(apu.read(0x4017), 0);
}
