//! English instruction text for OSRM route steps.
//!
//! Covers the maneuver types OSRM emits for car profiles. Unknown types
//! produce `None`; the caller falls back to a plain "Continue".

/// The parts of an OSRM step that drive its instruction text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepManeuver<'a> {
    /// OSRM maneuver `type`, e.g. `turn`, `depart`, `roundabout`.
    pub kind: &'a str,
    pub modifier: Option<&'a str>,
    /// Road name, possibly empty.
    pub road: &'a str,
    /// Roundabout exit number.
    pub exit: Option<u32>,
    /// Heading after the maneuver in degrees, 0 = north.
    pub bearing_after: Option<f64>,
}

pub fn compile(step: &StepManeuver<'_>) -> Option<String> {
    let modifier = step.modifier.unwrap_or("straight");

    let text = match step.kind {
        "depart" => match step.bearing_after {
            Some(bearing) => format!("Head {}", compass(bearing)),
            None => "Head out".to_string(),
        }
        .with_road(step.road, "on"),
        "arrive" => match side(step.modifier) {
            Some(side) => format!("You have arrived at your destination, on the {}", side),
            None => "You have arrived at your destination".to_string(),
        },
        "turn" | "roundabout turn" => match modifier {
            "uturn" => "Make a U-turn".with_road(step.road, "onto"),
            "straight" => "Go straight".with_road(step.road, "onto"),
            _ => format!("Turn {}", modifier).with_road(step.road, "onto"),
        },
        "new name" => {
            if step.road.is_empty() {
                direction_phrase("Continue", modifier)
            } else {
                format!("Continue onto {}", step.road)
            }
        }
        "continue" => match modifier {
            "uturn" => "Make a U-turn".with_road(step.road, "onto"),
            _ => direction_phrase("Continue", modifier).with_road(step.road, "onto"),
        },
        "merge" => direction_phrase("Merge", modifier).with_road(step.road, "onto"),
        "on ramp" => match side(step.modifier) {
            Some(side) => format!("Take the ramp on the {}", side),
            None => "Take the ramp".to_string(),
        }
        .with_road(step.road, "onto"),
        "off ramp" => match side(step.modifier) {
            Some(side) => format!("Take the exit on the {}", side),
            None => "Take the exit".to_string(),
        }
        .with_road(step.road, "onto"),
        "fork" => match side(step.modifier) {
            Some(side) => format!("Keep {} at the fork", side),
            None => "Keep straight at the fork".to_string(),
        }
        .with_road(step.road, "onto"),
        "end of road" => match side(step.modifier) {
            Some(side) => format!("Turn {} at the end of the road", side),
            None => "Continue at the end of the road".to_string(),
        }
        .with_road(step.road, "onto"),
        "roundabout" | "rotary" => match step.exit {
            Some(exit) => format!("Enter the roundabout and take the {} exit", ordinal(exit)),
            None => "Enter the roundabout".to_string(),
        }
        .with_road(step.road, "onto"),
        "exit roundabout" | "exit rotary" => "Exit the roundabout".with_road(step.road, "onto"),
        "notification" | "use lane" => direction_phrase("Continue", modifier),
        _ => return None,
    };

    Some(text)
}

trait WithRoad {
    fn with_road(self, road: &str, preposition: &str) -> String;
}

impl<S: Into<String>> WithRoad for S {
    fn with_road(self, road: &str, preposition: &str) -> String {
        let mut text = self.into();
        if !road.is_empty() {
            text.push(' ');
            text.push_str(preposition);
            text.push(' ');
            text.push_str(road);
        }
        text
    }
}

fn direction_phrase(verb: &str, modifier: &str) -> String {
    match modifier {
        "straight" => verb.to_string(),
        other => format!("{} {}", verb, other),
    }
}

fn side(modifier: Option<&str>) -> Option<&'static str> {
    let modifier = modifier?;
    if modifier.contains("left") {
        Some("left")
    } else if modifier.contains("right") {
        Some("right")
    } else {
        None
    }
}

fn compass(bearing: f64) -> &'static str {
    const POINTS: [&str; 8] = [
        "north",
        "northeast",
        "east",
        "southeast",
        "south",
        "southwest",
        "west",
        "northwest",
    ];
    let sector = ((bearing.rem_euclid(360.0) + 22.5) / 45.0) as usize % POINTS.len();
    POINTS[sector]
}

fn ordinal(n: u32) -> String {
    match n {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        _ => format!("{}th", n),
    }
}
