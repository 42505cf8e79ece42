//! Tempest Engine demo: a windowed weather viewer
//!
//! Keys: 1-6 pick an effect, Space pauses, V cycles the camera,
//! R resets it, Escape quits.

use std::sync::Arc;

use anyhow::Result;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use tempest_engine::{EngineConfig, WeatherCondition, WeatherEngine};

fn main() -> Result<()> {
    env_logger::init();

    let config = EngineConfig::default();
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.window_title)
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height))
            .build(&event_loop)?,
    );

    let mut engine = WeatherEngine::new(&config, window.clone())?;
    log::info!("starting with {} weather", engine.current_effect());

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => {
                engine.teardown();
                elwt.exit();
            }
            WindowEvent::Resized(size) => {
                let _ = engine.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        handle_key(&mut engine, code, elwt);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if engine.tick().is_ok() && engine.ticks() % 300 == 0 {
                    log::info!(
                        "{}: {} particles at {} fps",
                        engine.current_effect(),
                        engine.current_particle_count(),
                        engine.current_fps()
                    );
                }
            }
            _ => {}
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}

fn handle_key(engine: &mut WeatherEngine, code: KeyCode, elwt: &EventLoopWindowTarget<()>) {
    let effect = match code {
        KeyCode::Digit1 => Some(WeatherCondition::Sunny),
        KeyCode::Digit2 => Some(WeatherCondition::Rain),
        KeyCode::Digit3 => Some(WeatherCondition::Snow),
        KeyCode::Digit4 => Some(WeatherCondition::Cloudy),
        KeyCode::Digit5 => Some(WeatherCondition::Thunderstorm),
        KeyCode::Digit6 => Some(WeatherCondition::Mist),
        _ => None,
    };
    if let Some(condition) = effect {
        if engine.select_effect(condition, 1.0).is_ok() {
            log::info!("selected {condition}");
        }
        return;
    }

    match code {
        KeyCode::Space => {
            if let Ok(state) = engine.toggle_pause() {
                log::info!("animation {state:?}");
            }
        }
        KeyCode::KeyV => {
            if let Ok(preset) = engine.cycle_view() {
                log::info!("camera: {}", preset.name);
            }
        }
        KeyCode::KeyR => {
            if let Ok(preset) = engine.reset_view() {
                log::info!("camera: {}", preset.name);
            }
        }
        KeyCode::Escape => {
            engine.teardown();
            elwt.exit();
        }
        _ => {}
    }
}
