//! Player input collaborator
//!
//! Хост раз в кадр присылает `PlayerInputEvent` (оси, кнопки, дельта мыши).
//! `PlayerInputState` хранит:
//! - последние оси и sprint hold
//! - edges (jump / fire / reload) до момента, пока их не заберёт нужный step
//! - накопленную дельту мыши до следующего кадра

use bevy::prelude::*;

/// Один сэмпл input'а от хоста
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInputEvent {
    /// x = right, y = forward (каждая ось в [-1, 1])
    pub move_axes: Vec2,
    pub sprint: bool,
    /// Edge: нажатие в этом кадре
    pub jump: bool,
    pub fire: bool,
    pub reload: bool,
    /// Сырая дельта указателя (пиксели)
    pub look_delta: Vec2,
}

impl PlayerInputEvent {
    pub fn moving(move_axes: Vec2) -> Self {
        Self {
            move_axes,
            ..default()
        }
    }

    pub fn fire() -> Self {
        Self {
            fire: true,
            ..default()
        }
    }

    pub fn reload() -> Self {
        Self {
            reload: true,
            ..default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..default()
        }
    }

    pub fn look(look_delta: Vec2) -> Self {
        Self {
            look_delta,
            ..default()
        }
    }
}

/// Свёрнутое состояние input'а игрока
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInputState {
    pub move_axes: Vec2,
    pub sprint: bool,
    jump_pressed: bool,
    fire_pressed: bool,
    reload_pressed: bool,
    look_delta: Vec2,
}

impl PlayerInputState {
    /// Применить сэмпл: оси заменяются, edges защёлкиваются, дельта копится
    pub fn apply(&mut self, event: &PlayerInputEvent) {
        self.move_axes = event.move_axes.clamp(Vec2::NEG_ONE, Vec2::ONE);
        self.sprint = event.sprint;
        self.jump_pressed |= event.jump;
        self.fire_pressed |= event.fire;
        self.reload_pressed |= event.reload;
        self.look_delta += event.look_delta;
    }

    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }

    pub fn take_fire(&mut self) -> bool {
        std::mem::take(&mut self.fire_pressed)
    }

    pub fn take_reload(&mut self) -> bool {
        std::mem::take(&mut self.reload_pressed)
    }

    pub fn take_look_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.look_delta)
    }

    /// Сброс (смерть / respawn)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Система: свернуть PlayerInputEvent'ы кадра в PlayerInputState (PreUpdate)
pub fn collect_player_input(mut events: EventReader<PlayerInputEvent>, mut state: ResMut<PlayerInputState>) {
    for event in events.read() {
        state.apply(event);
    }
}
