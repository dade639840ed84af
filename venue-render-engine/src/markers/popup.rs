use bevy::prelude::*;
use constants::marker_settings::{POPUP_BACKGROUND, POPUP_HEADER_BACKGROUND, POPUP_WIDTH};

use super::kind::MarkerKind;
use super::selection::{MarkerSelection, SelectionDismissed};
use crate::engine::assets::marker_collection::Marker;

#[derive(Component)]
pub struct DetailPopupRoot;
#[derive(Component)]
pub struct DetailPopupTitle;
#[derive(Component)]
pub struct DetailPopupBody;
#[derive(Component)]
pub struct PopupCloseButton;

/// Body rows for the detail popup. Absent optional fields produce no row.
pub fn popup_rows(marker: &Marker) -> Vec<(&'static str, String)> {
    let kind = MarkerKind::from_tag(&marker.kind);
    let mut rows = vec![("Type", kind.display_name().to_string())];
    if let Some(description) = marker.description.as_ref().filter(|d| !d.trim().is_empty()) {
        rows.push(("About", description.clone()));
    }
    if let Some(capacity) = marker.capacity {
        rows.push(("Capacity", capacity.to_string()));
    }
    let [x, _, z] = marker.position;
    rows.push(("Location", format!("{x:.1}, {z:.1}")));
    rows
}

// Spawns the hidden detail popup with header, close button and an empty body
pub fn spawn_detail_popup(mut commands: Commands) {
    commands
        .spawn((
            DetailPopupRoot,
            Name::new("DetailPopup"),
            BackgroundColor(POPUP_BACKGROUND),
            BorderRadius::all(Val::Px(10.0)),
            Node {
                width: Val::Px(POPUP_WIDTH),
                position_type: PositionType::Absolute,
                right: Val::Px(16.0),
                top: Val::Px(16.0),
                display: Display::None,
                flex_direction: FlexDirection::Column,
                overflow: Overflow::clip(),
                ..default()
            },
            GlobalZIndex(20),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Name::new("Header"),
                    BackgroundColor(POPUP_HEADER_BACKGROUND),
                    Node {
                        width: Val::Percent(100.0),
                        padding: UiRect::all(Val::Px(12.0)),
                        display: Display::Flex,
                        align_items: AlignItems::Center,
                        justify_content: JustifyContent::SpaceBetween,
                        ..default()
                    },
                ))
                .with_children(|header| {
                    header.spawn((
                        DetailPopupTitle,
                        Text::new(""),
                        TextFont { font_size: 18.0, ..default() },
                        TextColor(Color::WHITE),
                    ));
                    header
                        .spawn((
                            PopupCloseButton,
                            Name::new("CloseButton"),
                            Button,
                            BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
                            BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                            Node {
                                width: Val::Px(28.0),
                                height: Val::Px(28.0),
                                display: Display::Flex,
                                align_items: AlignItems::Center,
                                justify_content: JustifyContent::Center,
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                        ))
                        .with_children(|button| {
                            button.spawn((
                                Text::new("x"),
                                TextFont { font_size: 16.0, ..default() },
                                TextColor(Color::WHITE),
                            ));
                        });
                });

            parent.spawn((
                DetailPopupBody,
                Name::new("Body"),
                Node {
                    padding: UiRect::all(Val::Px(12.0)),
                    row_gap: Val::Px(6.0),
                    flex_direction: FlexDirection::Column,
                    ..default()
                },
            ));
        });
}

// Mirrors the selection into the popup: hidden when empty, rebuilt on change
pub fn refresh_detail_popup(
    selection: Res<MarkerSelection>,
    mut commands: Commands,
    mut root: Query<&mut Node, With<DetailPopupRoot>>,
    mut title: Query<(&mut Text, &mut TextColor), With<DetailPopupTitle>>,
    body: Query<Entity, With<DetailPopupBody>>,
) {
    if !selection.is_changed() {
        return;
    }
    let Ok(mut root_node) = root.single_mut() else {
        return;
    };

    let Some(marker) = selection.current() else {
        root_node.display = Display::None;
        return;
    };
    root_node.display = Display::Flex;

    if let Ok((mut text, mut color)) = title.single_mut() {
        text.0 = marker.name.clone();
        color.0 = marker.tint();
    }

    let Ok(body) = body.single() else {
        return;
    };
    commands.entity(body).despawn_related::<Children>();
    commands.entity(body).with_children(|rows| {
        for (label, value) in popup_rows(marker) {
            rows.spawn(Node {
                flex_direction: FlexDirection::Column,
                ..default()
            })
            .with_children(|row| {
                row.spawn((
                    Text::new(label),
                    TextFont { font_size: 11.0, ..default() },
                    TextColor(Color::srgb(0.55, 0.57, 0.62)),
                ));
                row.spawn((
                    Text::new(value),
                    TextFont { font_size: 14.0, ..default() },
                    TextColor(Color::srgb(0.90, 0.91, 0.94)),
                ));
            });
        }
    });
}

// Close button dismisses the selection, the only in-viewer path to clear()
pub fn popup_close_button_interaction(
    mut q: Query<
        (&Interaction, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>, With<PopupCloseButton>),
    >,
    mut dismissals: EventWriter<SelectionDismissed>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                dismissals.write(SelectionDismissed);
                *bg = BackgroundColor(Color::srgb(0.18, 0.20, 0.24));
            }
            Interaction::Hovered => *bg = BackgroundColor(Color::srgb(0.26, 0.28, 0.32)),
            Interaction::None => *bg = BackgroundColor(Color::srgb(0.22, 0.24, 0.28)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_skip_missing_optionals() {
        let marker = Marker::new("e1", "entrance", Vec3::new(2.0, 0.0, -3.0), "Main Gate");
        let rows = popup_rows(&marker);
        let labels: Vec<_> = rows.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, ["Type", "Location"]);
        assert_eq!(rows[0].1, "Entrance");
        assert_eq!(rows[1].1, "2.0, -3.0");
    }

    #[test]
    fn rows_include_present_optionals() {
        let marker = Marker::new("f1", "food", Vec3::ZERO, "Tacos")
            .with_description("Street food")
            .with_capacity(40);
        let rows = popup_rows(&marker);
        assert!(rows.contains(&("About", "Street food".to_string())));
        assert!(rows.contains(&("Capacity", "40".to_string())));
    }

    fn popup_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<MarkerSelection>()
            .add_systems(Startup, spawn_detail_popup)
            .add_systems(Update, refresh_detail_popup);
        app
    }

    fn popup_display(app: &mut App) -> Display {
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Node, With<DetailPopupRoot>>();
        query.single(world).unwrap().display
    }

    #[test]
    fn popup_follows_selection() {
        let mut app = popup_app();
        app.update();
        assert_eq!(popup_display(&mut app), Display::None);

        app.world_mut()
            .resource_mut::<MarkerSelection>()
            .select(Marker::new("e1", "entrance", Vec3::ZERO, "Main Gate"));
        app.update();
        assert_eq!(popup_display(&mut app), Display::Flex);

        let world = app.world_mut();
        let mut titles = world.query_filtered::<&Text, With<DetailPopupTitle>>();
        assert_eq!(titles.single(world).unwrap().0, "Main Gate");

        app.world_mut().resource_mut::<MarkerSelection>().clear();
        app.update();
        assert_eq!(popup_display(&mut app), Display::None);
    }
}
