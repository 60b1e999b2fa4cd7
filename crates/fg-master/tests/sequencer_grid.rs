//! Sequencer timing and grid behavior over a recording note sink.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use fg_master::{
    LoopCallback, Note, NoteCommand, NoteControl, NoteSink, PlayerError, Sequencer, SlotBank,
    VoiceConfig, SLOT_COUNT,
};

#[derive(Clone, Debug, PartialEq)]
enum Event {
    Voice,
    Note(Note),
    Command(NoteCommand),
}

/// Records every command with its arrival time.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<(Instant, Event)>>,
}

impl Recorder {
    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap()
            .push((Instant::now(), event));
    }

    fn events(&self) -> Vec<(Instant, Event)> {
        self.events.lock().unwrap().clone()
    }

    fn count(&self, event: &Event) -> usize {
        self.events().iter().filter(|(_, e)| e == event).count()
    }
}

impl NoteSink for Recorder {
    fn set_voice(&self, _voice: Option<VoiceConfig>) -> Result<(), PlayerError> {
        self.push(Event::Voice);
        Ok(())
    }

    fn set_note(&self, note: Note) -> Result<(), PlayerError> {
        self.push(Event::Note(note));
        Ok(())
    }

    fn control_note(&self, command: NoteCommand) -> Result<(), PlayerError> {
        self.push(Event::Command(command));
        Ok(())
    }
}

#[test]
fn slot_index_table() {
    assert_eq!(Sequencer::slot_index(0, 0, 0), 0);
    assert_eq!(Sequencer::slot_index(1, 0, 0), 4);
    assert_eq!(Sequencer::slot_index(1, 1, 1), 7);
    assert_eq!(Sequencer::slot_index(7, 1, 1), SLOT_COUNT - 1);
}

#[test]
fn tempo_adjustment_is_rejected_at_the_bounds() {
    let recorder: Arc<dyn NoteSink> = Arc::new(Recorder::default());
    let seq = Sequencer::initialize(recorder, 20, None).unwrap();
    assert!(seq.adjust_bpm(-5).is_err());
    assert_eq!(seq.bpm(), 20, "rejected adjustment changed the tempo");
    assert_eq!(seq.adjust_bpm(100), Ok(120));
    assert!(seq.set_bpm(301).is_err());
    assert_eq!(seq.bpm(), 120);
    seq.destroy();
}

#[test]
fn rejects_out_of_range_tempo_at_initialize() {
    let recorder: Arc<dyn NoteSink> = Arc::new(Recorder::default());
    assert!(Sequencer::initialize(recorder, 19, None).is_err());
}

#[test]
fn one_note_in_slot_zero_plays_exactly_once_per_fill() {
    // 120 bpm: 125ms per step, 4s per 32-slot cycle. The callback fills
    // slot 0 on its first invocation only and clears it afterwards, so
    // the note-on must be issued exactly once even though the cycle
    // wraps.
    let recorder = Arc::new(Recorder::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let cb_calls = calls.clone();
    let callback: LoopCallback = Box::new(move |bank: &SlotBank| {
        if cb_calls.fetch_add(1, Ordering::SeqCst) == 0 {
            bank.fill(0, NoteControl::NoteOn, Some(0), None).unwrap();
        } else {
            bank.fill(0, NoteControl::None, None, None).unwrap();
        }
    });
    let seq = Sequencer::initialize(recorder.clone(), 120, Some(callback)).unwrap();

    let started = Instant::now();
    seq.start();
    // One full cycle plus enough slack for the second cycle to begin.
    thread::sleep(Duration::from_millis(32 * 125 + 300));
    seq.stop();
    thread::sleep(Duration::from_millis(50));
    seq.destroy();

    let events = recorder.events();
    let note_ons: Vec<_> = events
        .iter()
        .filter(|(_, e)| *e == Event::Command(NoteCommand::On))
        .collect();
    assert_eq!(note_ons.len(), 1, "events: {:?}", events);
    // The first step executes immediately after start.
    let offset = note_ons[0].0.duration_since(started);
    assert!(offset < Duration::from_millis(100), "late note-on: {:?}", offset);
    assert_eq!(recorder.count(&Event::Note(0)), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2, "callback calls");
}

#[test]
fn stop_parks_the_thread_and_silences_the_note() {
    let recorder = Arc::new(Recorder::default());
    let seq = Sequencer::initialize(recorder.clone(), 300, None).unwrap();
    for index in 0..SLOT_COUNT {
        seq.fill_slot(index, NoteControl::Stoccato, Some(0), None)
            .unwrap();
    }
    seq.start();
    thread::sleep(Duration::from_millis(150));
    seq.stop();
    thread::sleep(Duration::from_millis(100));
    let parked = recorder.events().len();
    assert!(recorder.count(&Event::Command(NoteCommand::Off)) >= 1);
    // Parked: no new commands while stopped.
    thread::sleep(Duration::from_millis(200));
    assert_eq!(recorder.events().len(), parked);
    // Resumes where it left off.
    seq.start();
    thread::sleep(Duration::from_millis(120));
    assert!(recorder.events().len() > parked);
    seq.destroy();
}

#[test]
fn reset_returns_to_slot_zero() {
    let recorder: Arc<dyn NoteSink> = Arc::new(Recorder::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let cb_calls = calls.clone();
    let callback: LoopCallback = Box::new(move |_bank: &SlotBank| {
        cb_calls.fetch_add(1, Ordering::SeqCst);
    });
    // 300 bpm: 50ms per step, 1.6s per cycle.
    let seq = Sequencer::initialize(recorder, 300, Some(callback)).unwrap();
    seq.start();
    thread::sleep(Duration::from_millis(150));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    seq.reset();
    thread::sleep(Duration::from_millis(150));
    assert_eq!(calls.load(Ordering::SeqCst), 2, "reset did not restart the cycle");
    seq.destroy();
}

#[test]
fn clear_empties_the_grid_without_stopping() {
    let recorder: Arc<dyn NoteSink> = Arc::new(Recorder::default());
    let seq = Sequencer::initialize(recorder, 120, None).unwrap();
    seq.fill_slot(4, NoteControl::NoteOn, Some(12), None).unwrap();
    seq.clear();
    assert!(seq.slot(4).unwrap().is_empty());
    seq.destroy();
}

#[test]
fn concurrent_slot_writes_are_never_torn() {
    // Two writers race distinct (control, note) pairs into slot 0; a
    // reader must only ever observe one of the complete pairs.
    let bank = SlotBank::new();
    let writer_a = {
        let bank = bank.clone();
        thread::spawn(move || {
            for _ in 0..2000 {
                bank.fill(0, NoteControl::NoteOn, Some(60), None).unwrap();
            }
        })
    };
    let writer_b = {
        let bank = bank.clone();
        thread::spawn(move || {
            for _ in 0..2000 {
                bank.fill(0, NoteControl::NoteOff, Some(-60), None).unwrap();
            }
        })
    };
    for _ in 0..4000 {
        let slot = bank.get(0).unwrap();
        match slot.control {
            NoteControl::None => assert_eq!(slot.note, None),
            NoteControl::NoteOn => assert_eq!(slot.note, Some(60)),
            NoteControl::NoteOff => assert_eq!(slot.note, Some(-60)),
            other => panic!("unexpected control {:?}", other),
        }
    }
    writer_a.join().unwrap();
    writer_b.join().unwrap();
}
