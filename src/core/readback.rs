//! Readback: a one-way push of `(position, velocity, zoom)` to whatever
//! observer the host registered.
//!
//! Values travel as 16.16 fixed point so the observer never has to agree on
//! a float layout.

use tokio::sync::mpsc::UnboundedSender;

const FIXED_ONE: f32 = 65536.0;

/// The simulation values an observer sees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub position: f32,
    pub velocity: f32,
    pub zoom: f32,
}

/// Three 16.16 fixed-point integers: position, velocity, zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadbackPacket(pub [i32; 3]);

impl ReadbackPacket {
    /// Pack a snapshot.  Each value is scaled by 65536 and truncated toward
    /// zero.
    pub fn pack(snapshot: Snapshot) -> Self {
        Self([
            to_fixed(snapshot.position),
            to_fixed(snapshot.velocity),
            to_fixed(snapshot.zoom),
        ])
    }

    pub fn unpack(self) -> Snapshot {
        let [position, velocity, zoom] = self.0;
        Snapshot {
            position: position as f32 / FIXED_ONE,
            velocity: velocity as f32 / FIXED_ONE,
            zoom: zoom as f32 / FIXED_ONE,
        }
    }
}

fn to_fixed(v: f32) -> i32 {
    (v * FIXED_ONE) as i32
}

// ───────────────────────────────────────── sinks ─────────────

/// Receives readback packets.  Delivery is fire-and-forget: a sink that
/// cannot deliver simply drops the packet.
pub trait ReadbackSink {
    fn send(&mut self, packet: ReadbackPacket);
}

impl ReadbackSink for UnboundedSender<ReadbackPacket> {
    fn send(&mut self, packet: ReadbackPacket) {
        // A closed receiver means nobody is watching any more.
        let _ = UnboundedSender::send(self, packet);
    }
}

/// Sink used until an observer is registered.
#[derive(Debug, Default)]
pub struct Discard;

impl ReadbackSink for Discard {
    fn send(&mut self, _packet: ReadbackPacket) {}
}

impl ReadbackSink for Vec<ReadbackPacket> {
    fn send(&mut self, packet: ReadbackPacket) {
        self.push(packet);
    }
}

// ───────────────────────────────────────── emitter ───────────

/// Tracks the last snapshot sent and decides whether a new one goes out.
#[derive(Debug, Clone)]
pub struct ReadbackEmitter {
    last: Option<Snapshot>,
    suppress_duplicates: bool,
}

impl ReadbackEmitter {
    pub fn new(suppress_duplicates: bool) -> Self {
        Self {
            last: None,
            suppress_duplicates,
        }
    }

    pub fn set_suppress_duplicates(&mut self, on: bool) {
        self.suppress_duplicates = on;
    }

    /// Send `snapshot` unless it is identical to the previous one and
    /// duplicates are suppressed.  Returns whether a packet was sent.
    pub fn emit(&mut self, snapshot: Snapshot, sink: &mut dyn ReadbackSink) -> bool {
        if self.suppress_duplicates && self.last == Some(snapshot) {
            return false;
        }
        self.last = Some(snapshot);

        let packet = ReadbackPacket::pack(snapshot);
        tracing::trace!(?packet, "readback");
        sink.send(packet);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(position: f32, velocity: f32, zoom: f32) -> Snapshot {
        Snapshot {
            position,
            velocity,
            zoom,
        }
    }

    #[test]
    fn packs_as_truncated_fixed_point() {
        let packet = ReadbackPacket::pack(snap(1.5, -0.75, 1.0));
        assert_eq!(packet.0, [98304, -49152, 65536]);

        // Truncation is toward zero for both signs.
        let packet = ReadbackPacket::pack(snap(1.0 / 65536.0 * 2.7, -1.0 / 65536.0 * 2.7, 0.0));
        assert_eq!(packet.0, [2, -2, 0]);
    }

    #[test]
    fn unpack_recovers_representable_values() {
        let s = snap(2.25, -3.5, 0.5);
        assert_eq!(ReadbackPacket::pack(s).unpack(), s);
    }

    #[test]
    fn identical_snapshots_are_sent_once() {
        let mut sink: Vec<ReadbackPacket> = Vec::new();
        let mut emitter = ReadbackEmitter::new(true);

        assert!(emitter.emit(snap(1.0, 0.0, 1.0), &mut sink));
        assert!(!emitter.emit(snap(1.0, 0.0, 1.0), &mut sink));
        assert!(emitter.emit(snap(1.0, 0.5, 1.0), &mut sink));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn duplicates_pass_when_suppression_is_off() {
        let mut sink: Vec<ReadbackPacket> = Vec::new();
        let mut emitter = ReadbackEmitter::new(false);
        emitter.emit(snap(0.0, 0.0, 0.0), &mut sink);
        emitter.emit(snap(0.0, 0.0, 0.0), &mut sink);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn channel_sink_ignores_closed_receiver() {
        let (mut tx, rx) = tokio::sync::mpsc::unbounded_channel::<ReadbackPacket>();
        drop(rx);
        ReadbackSink::send(&mut tx, ReadbackPacket([0; 3]));
    }
}
