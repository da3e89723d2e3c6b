use crate::error::DrillError;
use crate::show::Show;

/// Public API: parse a stored show document into a validated [`Show`].
///
/// Notes:
/// - Continuities are filed under their dot type; the `dotType` stored on each
///   continuity (and on continuities nested in two-steps) is reset to match.
/// - Sheet ids are kept; sheets added afterwards get ids past the largest one.
/// - Dot references in positions and dot orders must name declared dots.
pub fn parse_show_json(s: &str) -> Result<Show, DrillError> {
    let mut show: Show = serde_json::from_str(s)?;
    show.normalize();
    show.validate()?;
    Ok(show)
}

impl Show {
    /// Serialize to the stored show format read by [`parse_show_json`].
    pub fn to_json(&self) -> Result<String, DrillError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continuity::ContinuityKind;
    use crate::dot_type::DotType;
    use crate::ids::SheetId;

    const SHOW: &str = r#"{
        "name": "mini",
        "dots": [{"id": "A"}, {"id": "B"}],
        "sheets": [
            {
                "id": 4,
                "beats": 8,
                "positions": {
                    "A": {"x": 0, "y": 0},
                    "B": {"x": 2, "y": 0, "dotType": "solid"}
                },
                "continuities": {
                    "plain": [{"type": "gv", "dotType": "solid-x", "end": "CL"}]
                }
            }
        ]
    }"#;

    #[test]
    fn loads_and_normalizes() {
        let mut show = parse_show_json(SHOW).unwrap();
        assert_eq!(show.beats_per_step, 1);
        let sheet = &show.sheets[0];
        let gv = &sheet.continuities[&DotType::Plain][0];
        assert_eq!(gv.dot_type, DotType::Plain);
        assert!(matches!(&gv.kind, ContinuityKind::Grapevine(g) if !g.end.is_mark_time()));
        assert_eq!(show.add_sheet("next", 4), SheetId(5));
    }

    #[test]
    fn rejects_unknown_dot_positions() {
        let bad = SHOW.replace(r#""B": {"x": 2"#, r#""Z": {"x": 2"#);
        assert!(matches!(
            parse_show_json(&bad),
            Err(DrillError::UnknownDot { .. })
        ));
    }

    #[test]
    fn rejects_zero_beats_per_step() {
        let bad = SHOW.replace(r#""name": "mini","#, r#""name": "mini", "beatsPerStep": 0,"#);
        assert!(matches!(
            parse_show_json(&bad),
            Err(DrillError::InvalidBeatsPerStep { value: 0 })
        ));
    }

    #[test]
    fn rejects_repeated_sheet_ids() {
        let doc = r#"{
            "name": "twice",
            "dots": [{"id": "A"}],
            "sheets": [
                {"id": 0, "beats": 10, "positions": {"A": {"x": 0, "y": 0}}},
                {"id": 1, "beats": 8, "positions": {"A": {"x": 2, "y": 0}}},
                {"id": 0, "beats": 4, "positions": {"A": {"x": 6, "y": 0}}}
            ]
        }"#;
        assert_eq!(
            parse_show_json(doc).unwrap_err(),
            DrillError::DuplicateSheet { sheet: SheetId(0) }
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_show_json("{\"name\": 3}"),
            Err(DrillError::Parse { .. })
        ));
    }

    #[test]
    fn round_trips_through_json() {
        let show = parse_show_json(SHOW).unwrap();
        let again = parse_show_json(&show.to_json().unwrap()).unwrap();
        assert_eq!(again.sheets, show.sheets);
        assert_eq!(again.dots, show.dots);
    }
}
