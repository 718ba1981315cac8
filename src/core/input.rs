use glam::Vec2;

/// What a pointer event means for the orbit controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    None,
    Rotate { dx: f32, dy: f32 },
    PinchStart { distance: f32 },
    Pinch { distance: f32 },
    PinchEnd,
}

/// Active pointers by id, in press order. One pointer rotates, two pinch.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    active: Vec<(i32, Vec2)>,
}

impl PointerTracker {
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn pinch_distance(&self) -> Option<f32> {
        match self.active.as_slice() {
            [(_, a), (_, b), ..] => Some(a.distance(*b)),
            _ => None,
        }
    }

    pub fn down(&mut self, id: i32, pos: Vec2) -> Gesture {
        if let Some(entry) = self.active.iter_mut().find(|(i, _)| *i == id) {
            entry.1 = pos;
        } else {
            self.active.push((id, pos));
        }
        match self.active.len() {
            2 => self.restart_pinch(),
            _ => Gesture::None,
        }
    }

    pub fn moved(&mut self, id: i32, pos: Vec2) -> Gesture {
        let count = self.active.len();
        let Some(entry) = self.active.iter_mut().find(|(i, _)| *i == id) else {
            return Gesture::None;
        };
        let delta = pos - entry.1;
        entry.1 = pos;
        match count {
            1 => Gesture::Rotate {
                dx: delta.x,
                dy: delta.y,
            },
            2 => self
                .pinch_distance()
                .map(|distance| Gesture::Pinch { distance })
                .unwrap_or(Gesture::None),
            _ => Gesture::None,
        }
    }

    /// Release a pointer (up or cancel). Unknown ids are ignored. The first two
    /// pointers form the pinch pair; when that pair changes the pinch restarts
    /// from the remaining pair's distance.
    pub fn up(&mut self, id: i32) -> Gesture {
        let Some(index) = self.active.iter().position(|(i, _)| *i == id) else {
            return Gesture::None;
        };
        self.active.remove(index);
        match self.active.len() {
            1 if index < 2 => Gesture::PinchEnd,
            2 => self.restart_pinch(),
            n if n > 2 && index < 2 => self.restart_pinch(),
            _ => Gesture::None,
        }
    }

    fn restart_pinch(&self) -> Gesture {
        self.pinch_distance()
            .map(|distance| Gesture::PinchStart { distance })
            .unwrap_or(Gesture::None)
    }
}
