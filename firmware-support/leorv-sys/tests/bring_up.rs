// SPDX-FileCopyrightText: 2024 Google LLC
//
// SPDX-License-Identifier: Apache-2.0

use leorv_hal::caravel::addresses as caravel;
use leorv_hal::caravel::UserWindow;
use leorv_hal::manual_additions::housekeeping::ConfigBus;
use leorv_hal::manual_additions::logic_analyzer::ProbeBank;
use leorv_sim::{reset, with_soc, BusEvent, SimBus};
use leorv_sys::memory_probe::{MemoryProbe, CLEAR_WORDS, FILL_BYTES, POISON};
use leorv_sys::sequencer::{Sequencer, MANAGEMENT_DRIVES_ALL};

fn bring_up() {
    let sequencer = unsafe { Sequencer::new(ConfigBus::<SimBus>::new(), ProbeBank::new()) };
    let held = sequencer
        .configure_and_commit()
        .route_probes(MANAGEMENT_DRIVES_ALL)
        .drive_reset_sequence();
    let window = unsafe { UserWindow::<SimBus>::new() };
    MemoryProbe::new(held, window).run().unwrap();
}

const FILL_WORDS: [u32; 4] = [0x0302_0100, 0x0706_0504, 0x0B0A_0908, 0x0F0E_0D0C];

#[test]
fn lane_zero_follows_the_reset_script() {
    reset();
    bring_up();

    with_soc(|soc| {
        assert_eq!(soc.writes_to(caravel::LA0_DATA), [0, 1, 0, 2, 3]);
        for addr in [caravel::LA1_DATA, caravel::LA2_DATA, caravel::LA3_DATA] {
            assert_eq!(soc.writes_to(addr), [0]);
        }
        assert!(soc.port_switched());
    });
}

#[test]
fn poison_lands_between_port_switch_and_release() {
    reset();
    bring_up();

    with_soc(|soc| {
        let lane0: Vec<usize> = soc
            .events()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_write() && e.addr() == caravel::LA0_DATA)
            .map(|(i, _)| i)
            .collect();
        let poison = soc
            .events()
            .iter()
            .position(|e| matches!(e, BusEvent::Write { value: POISON, .. }))
            .unwrap();
        assert!(lane0[3] < poison && poison < lane0[4]);
        assert_eq!(soc.user_word(0), FILL_WORDS[0]);
    });
}

#[test]
fn nothing_is_routed_before_the_commit_resolves() {
    reset();
    with_soc(|soc| soc.set_xfer_latency(10));
    bring_up();

    with_soc(|soc| {
        let events = soc.events();
        let trigger = soc.first_write_to(caravel::MPRJ_XFER).unwrap();
        for enable in [caravel::SPI_ENABLE, caravel::WB_ENABLE] {
            assert!(soc.first_write_to(enable).unwrap() < trigger);
        }
        let resolved = events
            .iter()
            .position(|e| {
                matches!(e, BusEvent::Read { addr, value: 0, .. } if *addr == caravel::MPRJ_XFER)
            })
            .unwrap();
        assert_eq!(soc.reads_of(caravel::MPRJ_XFER), 11);
        assert!(events[..resolved]
            .iter()
            .all(|e| !e.is_write() || e.addr() != caravel::LA0_IENA));
        assert_eq!(soc.writes_to(caravel::LA3_OENB), [MANAGEMENT_DRIVES_ALL]);
    });
}

#[test]
fn ram_holds_fill_clear_and_copies() {
    reset();
    bring_up();

    with_soc(|soc| {
        for b in FILL_BYTES {
            assert_eq!(soc.user_byte(b), b as u8);
        }
        for (i, word) in FILL_WORDS.iter().enumerate() {
            assert_eq!(soc.user_word(i), *word);
        }
        // The copies run after the clear.
        assert_eq!(soc.user_word(10), FILL_WORDS[0]);
        assert_eq!(soc.user_word(13), FILL_WORDS[2]);
        assert_eq!(soc.user_byte(62), 0x04);
        for i in CLEAR_WORDS.filter(|&i| i != 10 && i != 13 && i != 15) {
            assert_eq!(soc.user_word(i), 0, "word {i}");
        }
        assert_eq!(soc.user_word(15), 0x0004_0000);
        assert_eq!(soc.user_word(CLEAR_WORDS.end), 0);
    });
}

#[test]
fn fill_precedes_clear() {
    reset();
    bring_up();

    with_soc(|soc| {
        let window = |e: &BusEvent| {
            e.is_write()
                && e.addr() >= caravel::USER_WINDOW_BASE
                && e.addr() < caravel::USER_WINDOW_BASE + caravel::USER_WINDOW_SIZE
        };
        let writes: Vec<BusEvent> = soc.events().iter().copied().filter(window).collect();
        let offsets: Vec<usize> = writes[..16]
            .iter()
            .map(|e| e.addr() - caravel::USER_WINDOW_BASE)
            .collect();
        assert_eq!(offsets, FILL_BYTES.collect::<Vec<_>>());
        assert_eq!(writes[16].addr(), caravel::USER_WINDOW_BASE + 4 * CLEAR_WORDS.start);
    });
}
