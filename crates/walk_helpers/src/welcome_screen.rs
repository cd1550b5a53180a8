use bevy::prelude::*;

#[derive(Component)]
pub struct WelcomeScreenElement;

const INK: Color = Color::srgb(0.29, 0.29, 0.29);
const ACCENT: Color = Color::srgb(1.0, 0.5, 0.82);

pub fn spawn_welcome_screen(commands: &mut Commands, title: &str, subtitle: &str, prompt: &str) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            WelcomeScreenElement,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(ACCENT),
                TextLayout::new_with_justify(JustifyText::Center),
            ));

            parent.spawn((
                Text::new(subtitle),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(INK),
                TextLayout::new_with_justify(JustifyText::Center),
            ));

            // "Tap to enter" text
            parent.spawn((
                Text::new(prompt),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(INK),
                TextLayout::new_with_justify(JustifyText::Center),
                Node {
                    margin: UiRect::top(Val::Percent(20.0)),
                    ..default()
                },
            ));
        });
}

pub fn despawn_welcome_screen(
    mut commands: Commands,
    welcome_elements: Query<Entity, With<WelcomeScreenElement>>,
) {
    for entity in welcome_elements.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
