use core::fmt;

/// One sample in display coordinates, after calibration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchPoint {
    pub x: u16,
    pub y: u16,
    pub pressure: u8,
    pub area: u8,
    pub valid: bool,
}

impl TouchPoint {
    pub const fn new(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            pressure: 0,
            area: 0,
            valid: true,
        }
    }

    pub const fn with_contact(x: u16, y: u16, pressure: u8, area: u8) -> Self {
        Self {
            x,
            y,
            pressure,
            area,
            valid: true,
        }
    }
}

/// Controller-space sample, only alive between the driver read and calibration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawTouch {
    pub x: u16,
    pub y: u16,
    pub pressure: u8,
    pub area: u8,
}

impl RawTouch {
    pub const fn new(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            pressure: 0,
            area: 0,
        }
    }
}

/// Content shift applied by the renderer, in display pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplayOffset {
    pub dx: i16,
    pub dy: i16,
}

impl DisplayOffset {
    pub const ZERO: Self = Self { dx: 0, dy: 0 };

    pub const fn new(dx: i16, dy: i16) -> Self {
        Self { dx, dy }
    }
}

/// Unshifted rectangle of a hit-testable UI region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaLayout {
    pub id: u16,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl AreaLayout {
    pub const fn new(id: u16, x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub id: u16,
    pub enabled: bool,
}

impl TouchArea {
    pub fn from_layout(layout: &AreaLayout, offset: DisplayOffset) -> Self {
        Self {
            x: i32::from(layout.x) + i32::from(offset.dx),
            y: i32::from(layout.y) + i32::from(offset.dy),
            width: i32::from(layout.width),
            height: i32::from(layout.height),
            id: layout.id,
            enabled: true,
        }
    }

    /// Half-open containment; disabled areas and invalid points never match.
    pub fn contains(&self, point: &TouchPoint) -> bool {
        let px = i32::from(point.x);
        let py = i32::from(point.y);
        self.enabled
            && point.valid
            && px >= self.x
            && px < self.x + self.width
            && py >= self.y
            && py < self.y + self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchEventKind {
    Down,
    Move,
    Up,
    LongPress,
    DoubleTap,
    Swipe(SwipeDirection),
}

impl TouchEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Down => "DOWN",
            Self::Move => "MOVE",
            Self::Up => "UP",
            Self::LongPress => "LONG_PRESS",
            Self::DoubleTap => "DOUBLE_TAP",
            Self::Swipe(SwipeDirection::Left) => "SWIPE_LEFT",
            Self::Swipe(SwipeDirection::Right) => "SWIPE_RIGHT",
            Self::Swipe(SwipeDirection::Up) => "SWIPE_UP",
            Self::Swipe(SwipeDirection::Down) => "SWIPE_DOWN",
        }
    }

    pub fn is_swipe(&self) -> bool {
        matches!(self, Self::Swipe(_))
    }
}

impl fmt::Display for TouchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: TouchEventKind,
    pub point: TouchPoint,
    pub start_point: TouchPoint,
    pub t_ms: u64,
    /// Id of the first enabled area containing `point`.
    pub sensor_index: Option<u16>,
}

impl TouchEvent {
    pub fn new(kind: TouchEventKind, t_ms: u64, point: TouchPoint, start_point: TouchPoint) -> Self {
        Self {
            kind,
            point,
            start_point,
            t_ms,
            sensor_index: None,
        }
    }
}

/// Press bookkeeping owned by the classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchState {
    pub is_pressed: bool,
    pub start_point: TouchPoint,
    pub current_point: TouchPoint,
    pub last_point: TouchPoint,
    pub press_start_ms: u64,
    pub last_event_ms: u64,
    pub tap_count: u8,
    pub long_press_triggered: bool,
}
