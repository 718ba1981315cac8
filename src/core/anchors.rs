// Points of interest on the lab model, in world space.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NamedAnchor {
    pub name: &'static str,
    pub position: [f32; 3],
}

pub const POINTS_OF_INTEREST: &[NamedAnchor] = &[
    NamedAnchor {
        name: "Scanning probe microscope",
        position: [0.55, 0.1, -0.35],
    },
    NamedAnchor {
        name: "Superconducting magnet",
        position: [0.2, 0.25, 0.1],
    },
    NamedAnchor {
        name: "Cryostat",
        position: [-0.15, 0.45, 0.3],
    },
    NamedAnchor {
        name: "Vibration isolation table",
        position: [0.6, -0.35, 0.15],
    },
    NamedAnchor {
        name: "Control electronics",
        position: [-0.55, 0.05, -0.4],
    },
    NamedAnchor {
        name: "Vacuum pump",
        position: [-0.3, -0.4, 0.45],
    },
];

/// CSS classes of the label element for the anchor at `index`.
#[inline]
pub fn label_class(index: usize) -> String {
    format!("point point-{}", index)
}

/// Badge text shown on the label; numbering starts at 1.
#[inline]
pub fn label_badge(index: usize) -> String {
    (index + 1).to_string()
}
