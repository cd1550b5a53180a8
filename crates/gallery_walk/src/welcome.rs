use bevy::prelude::*;
use walk_helpers::input::just_pressed_screen_position;
use walk_helpers::welcome_screen::{despawn_welcome_screen, spawn_welcome_screen};

use crate::AppState;

const TITLE: &str = "Sein & Younggun";
const SUBTITLE: &str = "Sunday, June 8th 2025, 2:00 p.m.\nAmanti Hotel Seoul";
const PROMPT: &str = "Tap to walk through our photos";

pub struct WelcomePlugin;

impl Plugin for WelcomePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Welcome), show_welcome)
            .add_systems(
                Update,
                enter_gallery_on_tap.run_if(in_state(AppState::Welcome)),
            )
            .add_systems(OnExit(AppState::Welcome), despawn_welcome_screen);
    }
}

fn show_welcome(mut commands: Commands) {
    spawn_welcome_screen(&mut commands, TITLE, SUBTITLE, PROMPT);
}

fn enter_gallery_on_tap(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let tapped = just_pressed_screen_position(&mouse_buttons, &touches, &windows).is_some();
    if tapped || keyboard.just_pressed(KeyCode::Enter) {
        info!("Entering the gallery");
        next_state.set(AppState::Gallery);
    }
}
