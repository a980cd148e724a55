//! Audio triggers and the sound backends behind them
//!
//! The simulation never touches playback. It queues [`AudioCue`]s on the
//! world state and the platform drains them into an [`AudioSink`] once per
//! frame. On the web the sink is a procedural WebAudio synth; natively the
//! cues are only logged.

use serde::{Deserialize, Serialize};

/// Peak volume of the breathing loop
pub const BREATHING_MAX_VOLUME: f32 = 0.6;
/// Volume change per reference frame while ramping
pub const BREATHING_FADE_RATE: f32 = 0.02;

/// A named audio trigger requested by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AudioCue {
    PlayHit,
    PlayCandyCollect,
    PlayHeartCollect,
    PlayJawbreakerCollect,
    PlayJawbreakerExplosion,
    PlayPumpkinHit,
    PlayRandomZombieNoise,
    PlayJumpSound,
    StartAmbientLoop,
    StopAmbientLoop,
    FadeAmbient { duration_ms: u32 },
    UpdateBreathingLoop { active: bool, dt: f32 },
    StopBreathing,
    StartMainMusic,
    StopMainMusic,
    StartStatic,
    PauseAll,
}

/// Audio collaborator. Every operation is fire-and-forget.
pub trait AudioSink {
    fn play_hit(&mut self);
    fn play_candy_collect(&mut self);
    fn play_heart_collect(&mut self);
    fn play_jawbreaker_collect(&mut self);
    fn play_jawbreaker_explosion(&mut self);
    fn play_pumpkin_hit(&mut self);
    fn play_random_zombie_noise(&mut self);
    fn play_jump_sound(&mut self);
    fn start_ambient_loop(&mut self);
    fn stop_ambient_loop(&mut self);
    fn fade_ambient(&mut self, duration_ms: u32);
    fn update_breathing_loop(&mut self, active: bool, dt: f32);
    fn stop_breathing(&mut self);
    fn start_main_music(&mut self);
    fn stop_main_music(&mut self);
    fn start_static(&mut self);
    fn pause_all(&mut self);
}

/// Route one cue to the matching sink operation
pub fn dispatch<S: AudioSink + ?Sized>(sink: &mut S, cue: AudioCue) {
    match cue {
        AudioCue::PlayHit => sink.play_hit(),
        AudioCue::PlayCandyCollect => sink.play_candy_collect(),
        AudioCue::PlayHeartCollect => sink.play_heart_collect(),
        AudioCue::PlayJawbreakerCollect => sink.play_jawbreaker_collect(),
        AudioCue::PlayJawbreakerExplosion => sink.play_jawbreaker_explosion(),
        AudioCue::PlayPumpkinHit => sink.play_pumpkin_hit(),
        AudioCue::PlayRandomZombieNoise => sink.play_random_zombie_noise(),
        AudioCue::PlayJumpSound => sink.play_jump_sound(),
        AudioCue::StartAmbientLoop => sink.start_ambient_loop(),
        AudioCue::StopAmbientLoop => sink.stop_ambient_loop(),
        AudioCue::FadeAmbient { duration_ms } => sink.fade_ambient(duration_ms),
        AudioCue::UpdateBreathingLoop { active, dt } => sink.update_breathing_loop(active, dt),
        AudioCue::StopBreathing => sink.stop_breathing(),
        AudioCue::StartMainMusic => sink.start_main_music(),
        AudioCue::StopMainMusic => sink.stop_main_music(),
        AudioCue::StartStatic => sink.start_static(),
        AudioCue::PauseAll => sink.pause_all(),
    }
}

/// Drain a cue queue into a sink, preserving order
pub fn dispatch_all<S, I>(sink: &mut S, cues: I)
where
    S: AudioSink + ?Sized,
    I: IntoIterator<Item = AudioCue>,
{
    for cue in cues {
        dispatch(sink, cue);
    }
}

/// What a breathing update asks the backend to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopChange {
    None,
    Start,
    Stop,
}

/// Volume ramp for the breathing loop.
///
/// Ramps toward full volume while active, back to silence otherwise, and
/// reports when the underlying voice should start or stop.
#[derive(Debug, Clone, Default)]
pub struct BreathingLoop {
    pub volume: f32,
    pub playing: bool,
}

impl BreathingLoop {
    pub fn update(&mut self, active: bool, dt: f32) -> LoopChange {
        let step = BREATHING_FADE_RATE * dt;
        if active {
            self.volume = (self.volume + step).min(BREATHING_MAX_VOLUME);
            if !self.playing {
                self.playing = true;
                return LoopChange::Start;
            }
        } else {
            self.volume = (self.volume - step).max(0.0);
            if self.volume == 0.0 && self.playing {
                self.playing = false;
                return LoopChange::Stop;
            }
        }
        LoopChange::None
    }

    pub fn stop(&mut self) {
        self.volume = 0.0;
        self.playing = false;
    }
}

/// Sink that only logs; used by the headless binary
#[derive(Debug, Default)]
pub struct LogSink {
    pub breathing: BreathingLoop,
    pub played: usize,
}

impl LogSink {
    fn note(&mut self, name: &str) {
        self.played += 1;
        log::debug!("audio: {name}");
    }
}

impl AudioSink for LogSink {
    fn play_hit(&mut self) {
        self.note("hit");
    }
    fn play_candy_collect(&mut self) {
        self.note("candy");
    }
    fn play_heart_collect(&mut self) {
        self.note("heart");
    }
    fn play_jawbreaker_collect(&mut self) {
        self.note("jawbreaker");
    }
    fn play_jawbreaker_explosion(&mut self) {
        self.note("explosion");
    }
    fn play_pumpkin_hit(&mut self) {
        self.note("pumpkin");
    }
    fn play_random_zombie_noise(&mut self) {
        self.note("zombie");
    }
    fn play_jump_sound(&mut self) {
        self.note("jump");
    }
    fn start_ambient_loop(&mut self) {
        self.note("ambient start");
    }
    fn stop_ambient_loop(&mut self) {
        self.note("ambient stop");
    }
    fn fade_ambient(&mut self, duration_ms: u32) {
        log::debug!("audio: ambient fade {duration_ms}ms");
    }
    fn update_breathing_loop(&mut self, active: bool, dt: f32) {
        match self.breathing.update(active, dt) {
            LoopChange::Start => self.note("breathing start"),
            LoopChange::Stop => self.note("breathing stop"),
            LoopChange::None => {}
        }
    }
    fn stop_breathing(&mut self) {
        self.breathing.stop();
    }
    fn start_main_music(&mut self) {
        self.note("music start");
    }
    fn stop_main_music(&mut self) {
        self.note("music stop");
    }
    fn start_static(&mut self) {
        self.note("static");
    }
    fn pause_all(&mut self) {
        self.breathing.stop();
        self.note("pause all");
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, BreathingLoop, LoopChange};

    /// A sustained oscillator voice (drones, loops)
    struct Voice {
        osc: OscillatorNode,
        gain: GainNode,
    }

    impl Voice {
        fn stop(self) {
            self.osc.stop().ok();
            self.osc.disconnect().ok();
        }
    }

    /// Procedural WebAudio backend - no sound files needed
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        breathing: BreathingLoop,
        breath_voice: Option<Voice>,
        ambient: Option<Voice>,
        music: Option<Voice>,
        static_noise: Option<Voice>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Fails outside a secure context; the game carries on silently
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                breathing: BreathingLoop::default(),
                breath_voice: None,
                ambient: None,
                music: None,
                static_noise: None,
            }
        }

        /// Resume the context (browsers require a user gesture first)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// One-shot blip with an exponential decay and pitch sweep
        fn blip(&self, from_hz: f32, to_hz: f32, osc_type: OscillatorType, level: f32, secs: f64) {
            let Some(ctx) = &self.ctx else { return };
            self.resume();
            let Some((osc, gain)) = Self::create_osc(ctx, from_hz, osc_type) else {
                return;
            };
            let t = ctx.current_time();
            let vol = self.master_volume * level;

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + secs)
                .ok();
            osc.frequency().set_value_at_time(from_hz, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to_hz, t + secs)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + secs + 0.05).ok();
        }

        fn sustain(&self, freq: f32, osc_type: OscillatorType, level: f32) -> Option<Voice> {
            let ctx = self.ctx.as_ref()?;
            self.resume();
            let (osc, gain) = Self::create_osc(ctx, freq, osc_type)?;
            gain.gain().set_value(self.master_volume * level);
            osc.start().ok()?;
            Some(Voice { osc, gain })
        }
    }

    impl AudioSink for WebAudio {
        fn play_hit(&mut self) {
            self.blip(220.0, 55.0, OscillatorType::Sawtooth, 0.5, 0.3);
        }

        fn play_candy_collect(&mut self) {
            self.blip(880.0, 1320.0, OscillatorType::Square, 0.25, 0.12);
        }

        fn play_heart_collect(&mut self) {
            self.blip(440.0, 880.0, OscillatorType::Triangle, 0.35, 0.35);
        }

        fn play_jawbreaker_collect(&mut self) {
            self.blip(660.0, 990.0, OscillatorType::Square, 0.3, 0.2);
        }

        fn play_jawbreaker_explosion(&mut self) {
            self.blip(100.0, 30.0, OscillatorType::Sawtooth, 0.5, 0.4);
            self.blip(1500.0, 600.0, OscillatorType::Square, 0.2, 0.1);
        }

        fn play_pumpkin_hit(&mut self) {
            self.blip(160.0, 70.0, OscillatorType::Triangle, 0.45, 0.15);
        }

        fn play_random_zombie_noise(&mut self) {
            let pitch = 70.0 + js_sys::Math::random() as f32 * 50.0;
            self.blip(pitch, pitch * 0.6, OscillatorType::Sawtooth, 0.12, 0.5);
        }

        fn play_jump_sound(&mut self) {
            self.blip(523.0, 1046.0, OscillatorType::Square, 0.25, 0.15);
        }

        fn start_ambient_loop(&mut self) {
            if self.ambient.is_none() {
                self.ambient = self.sustain(55.0, OscillatorType::Sine, 0.3);
            }
        }

        fn stop_ambient_loop(&mut self) {
            if let Some(voice) = self.ambient.take() {
                voice.stop();
            }
        }

        fn fade_ambient(&mut self, duration_ms: u32) {
            let (Some(ctx), Some(voice)) = (&self.ctx, &self.ambient) else {
                return;
            };
            let t = ctx.current_time();
            let param = voice.gain.gain();
            param.set_value_at_time(param.value(), t).ok();
            param
                .linear_ramp_to_value_at_time(0.0, t + duration_ms as f64 / 1000.0)
                .ok();
        }

        fn update_breathing_loop(&mut self, active: bool, dt: f32) {
            match self.breathing.update(active, dt) {
                LoopChange::Start => {
                    if self.breath_voice.is_none() {
                        self.breath_voice = self.sustain(90.0, OscillatorType::Triangle, 0.0);
                    }
                }
                LoopChange::Stop => {
                    if let Some(voice) = self.breath_voice.take() {
                        voice.stop();
                    }
                }
                LoopChange::None => {}
            }
            if let Some(voice) = &self.breath_voice {
                voice
                    .gain
                    .gain()
                    .set_value(self.breathing.volume * self.master_volume * 0.3);
            }
        }

        fn stop_breathing(&mut self) {
            self.breathing.stop();
            if let Some(voice) = self.breath_voice.take() {
                voice.stop();
            }
        }

        fn start_main_music(&mut self) {
            if self.music.is_none() {
                self.music = self.sustain(110.0, OscillatorType::Square, 0.08);
            }
        }

        fn stop_main_music(&mut self) {
            if let Some(voice) = self.music.take() {
                voice.stop();
            }
        }

        fn start_static(&mut self) {
            if let Some(voice) = self.static_noise.take() {
                voice.stop();
            }
            self.static_noise = self.sustain(3000.0, OscillatorType::Sawtooth, 0.05);
        }

        fn pause_all(&mut self) {
            self.stop_breathing();
            self.stop_main_music();
            self.stop_ambient_loop();
            if let Some(voice) = self.static_noise.take() {
                voice.stop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breathing_ramp() {
        let mut breathing = BreathingLoop::default();
        assert_eq!(breathing.update(true, 1.0), LoopChange::Start);
        for _ in 0..100 {
            assert_eq!(breathing.update(true, 1.0), LoopChange::None);
        }
        assert_eq!(breathing.volume, BREATHING_MAX_VOLUME);

        let mut change = LoopChange::None;
        for _ in 0..40 {
            let c = breathing.update(false, 1.0);
            if c != LoopChange::None {
                change = c;
            }
        }
        assert_eq!(change, LoopChange::Stop);
        assert!(!breathing.playing);
    }

    #[test]
    fn test_dispatch_routes_every_cue() {
        let mut sink = LogSink::default();
        dispatch_all(
            &mut sink,
            [
                AudioCue::PlayHit,
                AudioCue::PlayCandyCollect,
                AudioCue::FadeAmbient { duration_ms: 2000 },
                AudioCue::UpdateBreathingLoop { active: true, dt: 1.0 },
            ],
        );
        // fade is not counted; breathing start is
        assert_eq!(sink.played, 3);
        assert!(sink.breathing.playing);
    }
}
