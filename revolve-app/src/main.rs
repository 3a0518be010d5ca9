//! Revolve - Terminal Virtual Turntable
//!
//! A record spins in your terminal; drop a track on it, grab it with the
//! mouse, and scratch.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Position},
    Terminal,
};

use revolve_audio::{AudioCommand, AudioEngine, AudioEvent, EngineState};
use revolve_input::{Command, KeyHandler, ScratchController};
use revolve_library::{import_dir, Config, DecodeOutcome, Track, TrackLoader};
use revolve_motion::PlatterPhysics;
use revolve_tui::{
    App, DragState, LibraryWidget, PlatterGeometry, PlatterWidget, StatusBarWidget,
};

/// Frame rate for the UI and the rotation animation loop
const FPS: u64 = 60;

/// Gain reached when play fades the audio in
const PLAY_GAIN: f32 = 0.9;

/// Fade durations for play (in) and pause (out), seconds
const PLAY_FADE_SECS: f32 = 0.5;
const PAUSE_FADE_SECS: f32 = 0.5;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Create audio channels
    let (cmd_tx, cmd_rx, evt_tx, evt_rx) = AudioEngine::create_channels();

    // Shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_audio = shutdown.clone();

    // Spawn audio thread
    let audio_handle = thread::spawn(move || {
        run_audio_thread(cmd_rx, evt_tx, shutdown_audio);
    });

    // Create engine handle for main thread
    let engine = AudioEngine::new(cmd_tx, evt_rx);

    // Run main event loop
    let result = run_app(&mut terminal, engine, shutdown.clone());

    // Cleanup
    shutdown.store(true, Ordering::SeqCst);
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Wait for audio thread
    let _ = audio_handle.join();

    result
}

/// Log to a file; a TUI cannot share stdout with the renderer
fn init_tracing() {
    let Some(dir) = dirs::data_dir() else {
        return;
    };
    let log_dir = dir.join("revolve");
    if std::fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(log_dir.join("revolve.log")) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(file)
        .with_ansi(false)
        .try_init();
}

fn run_audio_thread(
    cmd_rx: Receiver<AudioCommand>,
    evt_tx: crossbeam_channel::Sender<AudioEvent>,
    shutdown: Arc<AtomicBool>,
) {
    // Get audio host and device
    let host = cpal::default_host();
    let device = match host.default_output_device() {
        Some(d) => d,
        None => {
            let _ = evt_tx.send(AudioEvent::Error("No audio output device found".into()));
            return;
        }
    };

    let config = match device.default_output_config() {
        Ok(c) => c,
        Err(e) => {
            let _ = evt_tx.send(AudioEvent::Error(format!(
                "Failed to get audio config: {}",
                e
            )));
            return;
        }
    };

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;

    // Create engine state
    let engine_state = Arc::new(parking_lot::Mutex::new(EngineState::new(sample_rate)));
    let engine_for_callback = engine_state.clone();

    // Pre-allocate stereo conversion buffer (avoid allocation in audio callback)
    let mut stereo_conversion_buffer = vec![0.0f32; 16384];

    // State update interval
    let mut last_state_update = Instant::now();
    let state_update_interval = Duration::from_millis(33); // ~30fps

    // Build audio stream
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            // Use try_lock to avoid blocking the real-time audio thread.
            // On contention (rare), output silence rather than blocking.
            if let Some(mut state) = engine_for_callback.try_lock() {
                if channels == 2 {
                    state.process(data);
                } else {
                    // Downmix for mono devices using the pre-allocated buffer
                    let frames = data.len() / channels;
                    let stereo_len = frames * 2;
                    if stereo_len > stereo_conversion_buffer.len() {
                        stereo_conversion_buffer.resize(stereo_len, 0.0);
                    }
                    let stereo = &mut stereo_conversion_buffer[..stereo_len];
                    state.process(stereo);
                    for (i, frame) in data.chunks_mut(channels).enumerate() {
                        let mixed = (stereo[i * 2] + stereo[i * 2 + 1]) * 0.5;
                        for sample in frame.iter_mut() {
                            *sample = mixed;
                        }
                    }
                }
            } else {
                data.fill(0.0);
            }
        },
        |err| {
            tracing::warn!(error = %err, "audio stream error");
        },
        None,
    );

    let stream = match stream {
        Ok(s) => s,
        Err(e) => {
            let _ = evt_tx.send(AudioEvent::Error(format!(
                "Failed to create audio stream: {}",
                e
            )));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = evt_tx.send(AudioEvent::Error(format!("Failed to start audio: {}", e)));
        return;
    }

    // Tell the UI which rate to decode to
    let _ = evt_tx.send(AudioEvent::Ready { sample_rate });

    // Command processing loop
    while !shutdown.load(Ordering::Relaxed) {
        match cmd_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(AudioCommand::Shutdown) => break,
            Ok(cmd) => engine_state.lock().handle_command(cmd),
            Err(_) => {}
        }

        // Send state updates periodically
        if last_state_update.elapsed() >= state_update_interval {
            let _ = evt_tx.try_send(engine_state.lock().state());
            last_state_update = Instant::now();
        }
    }

    // Dropping the stream releases the audio device.
    drop(stream);
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: AudioEngine,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let mut app = App::new();
    let key_handler = KeyHandler::new();

    // Physics tunables, with config overrides
    let config = Config::load();
    let mut physics = PlatterPhysics::default();
    if let Some(v) = config.scratch_factor {
        physics.scratch_factor = v;
    }
    if let Some(v) = config.rotation_speed {
        physics.rotation_speed = v;
    }
    if let Some(v) = config.friction {
        physics.friction = v.clamp(0.0, 1.0);
    }
    let mut scratch = ScratchController::new(physics);

    // Import tracks: CLI folder beats config beats the bundled demos
    let music_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.music_folder.clone())
        .unwrap_or_else(|| PathBuf::from("demos"));
    let tracks = import_dir(&music_dir);
    let track_count = tracks.len();
    app.state.library.set_tracks(tracks);

    if track_count > 0 {
        app.state.set_message(format!(
            "{} tracks from {} | drag one onto the record",
            track_count,
            music_dir.display()
        ));
    } else {
        app.state
            .set_message("no tracks found | revolve <music-folder>");
    }

    // In-flight decode, tagged with a generation so a replaced track's
    // decode is discarded when it lands late
    let mut load_generation: u64 = 0;
    let mut pending_load: Option<Receiver<DecodeOutcome>> = None;

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    loop {
        // Check for shutdown
        if shutdown.load(Ordering::Relaxed) || app.should_quit {
            engine.send(AudioCommand::Shutdown);
            break;
        }

        // Process audio events
        while let Ok(event) = engine.event_rx.try_recv() {
            app.state.handle_audio_event(event);
        }

        // Process a finished decode, if any
        if let Some(rx) = &pending_load {
            match rx.try_recv() {
                Ok(outcome) => {
                    pending_load = None;
                    handle_decode_outcome(&mut app, &engine, outcome, load_generation);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => pending_load = None,
            }
        }

        // Rotation animation loop: ease velocity toward target, decay free
        // spin, advance the angle, and feed the result to the audio engine.
        let scratching = scratch.is_scratching();
        physics.tick(&mut app.state.rotation, scratching);
        engine.send(AudioCommand::SetVelocity {
            velocity: app.state.rotation.velocity,
            base_speed: physics.rotation_speed,
        });

        // Render
        terminal.draw(|frame| render_ui(frame, &mut app, scratching))?;

        // Handle input
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(cmd) = key_handler.handle_key(key) {
                        handle_command(
                            &mut app,
                            &engine,
                            &physics,
                            cmd,
                            &mut load_generation,
                            &mut pending_load,
                        );
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(
                        &mut app,
                        &engine,
                        &physics,
                        &mut scratch,
                        mouse,
                        &mut load_generation,
                        &mut pending_load,
                    );
                }
                _ => {}
            }
        }

        // Maintain frame rate
        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
        last_frame = Instant::now();
    }

    Ok(())
}

/// Transport play: spin the platter up and fade the audio in
fn transport_play(app: &mut App, engine: &AudioEngine, physics: &PlatterPhysics) {
    app.state.playing = true;
    app.state.rotation.target_velocity = physics.rotation_speed;
    if physics.is_dead_start(&app.state.rotation) {
        app.state.rotation.velocity = physics.kick_velocity();
    }
    engine.send(AudioCommand::Play);
    engine.send(AudioCommand::Fade {
        target: PLAY_GAIN,
        secs: PLAY_FADE_SECS,
    });
}

/// Transport pause: spin down and fade out, stop deferred to the fade end
fn transport_pause(app: &mut App, engine: &AudioEngine) {
    app.state.playing = false;
    app.state.rotation.target_velocity = 0.0;
    engine.send(AudioCommand::Pause {
        fade_secs: PAUSE_FADE_SECS,
    });
}

/// Drop a track onto the platter: replace the loaded track, reset the
/// position to the start, and begin playback as soon as the decode lands
fn drop_track(
    app: &mut App,
    engine: &AudioEngine,
    physics: &PlatterPhysics,
    track: Track,
    load_generation: &mut u64,
    pending_load: &mut Option<Receiver<DecodeOutcome>>,
) {
    *load_generation += 1;

    let loader =
        TrackLoader::with_sample_rate(app.state.engine_sample_rate.unwrap_or(48_000));
    *pending_load = Some(loader.load_async(track.clone(), *load_generation));

    app.state.set_message(format!("loading {}…", track.title));
    app.state.current_track = Some(track);

    // The platter starts turning right away; audio follows when decoded.
    transport_play(app, engine, physics);
}

fn handle_decode_outcome(
    app: &mut App,
    engine: &AudioEngine,
    outcome: DecodeOutcome,
    current_generation: u64,
) {
    if outcome.generation != current_generation {
        tracing::debug!(track = %outcome.track.title, "stale decode discarded");
        return;
    }

    match outcome.result {
        Ok(loaded) => {
            engine.send(AudioCommand::Load {
                samples: Arc::new(loaded.samples),
                sample_rate: loaded.sample_rate,
                title: Some(outcome.track.title.clone()),
            });
            if app.state.playing {
                engine.send(AudioCommand::Play);
                engine.send(AudioCommand::Fade {
                    target: PLAY_GAIN,
                    secs: PLAY_FADE_SECS,
                });
            }
            app.state.message = None;
        }
        Err(e) => {
            // The engine keeps no buffer; playback stays a no-op until the
            // next drop. Rotation continues regardless.
            app.state
                .set_message(format!("can't play {}: {}", outcome.track.title, e));
        }
    }
}

fn handle_command(
    app: &mut App,
    engine: &AudioEngine,
    physics: &PlatterPhysics,
    cmd: Command,
    load_generation: &mut u64,
    pending_load: &mut Option<Receiver<DecodeOutcome>>,
) {
    match cmd {
        Command::Play => transport_play(app, engine, physics),
        Command::Pause => transport_pause(app, engine),
        Command::TogglePlay => {
            if app.state.playing {
                transport_pause(app, engine);
            } else {
                transport_play(app, engine, physics);
            }
        }

        Command::SelectNext => app.state.library.select_next(),
        Command::SelectPrev => app.state.library.select_prev(),
        Command::SelectFirst => app.state.library.select_first(),
        Command::SelectLast => app.state.library.select_last(),

        Command::DropSelected => {
            if let Some(track) = app.state.library.selected_track().cloned() {
                drop_track(app, engine, physics, track, load_generation, pending_load);
            }
        }

        Command::Quit => app.quit(),
    }
}

fn handle_mouse(
    app: &mut App,
    engine: &AudioEngine,
    physics: &PlatterPhysics,
    scratch: &mut ScratchController,
    mouse: MouseEvent,
    load_generation: &mut u64,
    pending_load: &mut Option<Receiver<DecodeOutcome>>,
) {
    let geometry = PlatterGeometry::from_widget_area(app.state.platter_area);
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if geometry.contains(column, row) {
                // Grab the record: silence first, the center and start
                // angle come from the current layout.
                engine.send(AudioCommand::Stop);
                scratch.begin(
                    geometry.center,
                    PlatterGeometry::to_square(column, row),
                    &mut app.state.rotation,
                );
            } else if app.state.library_area.contains(Position::new(column, row)) {
                if let Some(index) = app.state.library.select_at(app.state.library_area, row) {
                    app.state.drag = Some(DragState {
                        track_index: index,
                        over_platter: false,
                    });
                }
            }
        }

        MouseEventKind::Drag(MouseButton::Left) => {
            if scratch.is_scratching() {
                if let Some(mv) = scratch.on_move(
                    PlatterGeometry::to_square(column, row),
                    &mut app.state.rotation,
                ) {
                    engine.send(AudioCommand::Nudge {
                        delta_secs: mv.audio_delta_secs,
                    });
                }
            } else if let Some(drag) = &mut app.state.drag {
                drag.over_platter = geometry.contains(column, row);
            }
        }

        // Release anywhere ends the gesture, not just over the record.
        MouseEventKind::Up(MouseButton::Left) => {
            if scratch.is_scratching() {
                scratch.release(&mut app.state.rotation, app.state.playing);
            } else if let Some(drag) = app.state.drag.take() {
                if geometry.contains(column, row) {
                    if let Some(track) = app.state.library.tracks.get(drag.track_index).cloned() {
                        drop_track(app, engine, physics, track, load_generation, pending_load);
                    }
                }
            }
        }

        _ => {}
    }
}

fn render_ui(frame: &mut ratatui::Frame, app: &mut App, scratching: bool) {
    let area = frame.area();
    let theme = app.state.theme.clone();

    // Clear with background
    let block = ratatui::widgets::Block::default().style(theme.normal());
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(10),   // Main content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let main = Layout::horizontal([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[0]);

    // Remember hit-test rectangles for mouse routing.
    app.state.platter_area = main[0];
    app.state.library_area = main[1];

    let drop_hover = app
        .state
        .drag
        .map(|d| d.over_platter)
        .unwrap_or(false);

    let platter = PlatterWidget::new(&theme, app.state.rotation.angle_degrees)
        .track(app.state.current_track.as_ref())
        .drop_hover(drop_hover)
        .scratching(scratching);
    frame.render_widget(platter, main[0]);

    let dragging = app.state.drag.map(|d| d.track_index);
    let library = LibraryWidget::new(&mut app.state.library, &theme).dragging(dragging);
    frame.render_widget(library, main[1]);

    let status = StatusBarWidget::new(&app.state.player, &theme)
        .message(app.state.message.as_deref());
    frame.render_widget(status, chunks[1]);
}
