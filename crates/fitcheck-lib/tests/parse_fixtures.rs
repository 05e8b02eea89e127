mod common;

use fitcheck_lib::{parse_fitting, SkillResolver, SlotCategory};

use common::{fitting_text, fixture_catalog};

#[test]
fn slot_counts_match_non_placeholder_lines() {
    let catalog = fixture_catalog();
    let text = fitting_text("rifter_tackle.eft");
    let fit = parse_fitting(&text, &catalog).expect("fixture parses");

    let expected = [
        (SlotCategory::Low, 1),
        (SlotCategory::Mid, 1),
        (SlotCategory::High, 2),
        (SlotCategory::Rig, 1),
        (SlotCategory::Sub, 0),
    ];
    for (category, count) in expected {
        assert_eq!(fit.slot_count(category), count, "{} slots", category.label());
    }
}

#[test]
fn crlf_fixture_with_charges_and_drones() {
    let catalog = fixture_catalog();
    let text = fitting_text("rifter_drones.eft");
    assert!(text.contains("\r\n"), "fixture keeps CRLF line endings");

    let fit = parse_fitting(&text, &catalog).expect("fixture parses");
    assert_eq!(fit.fit_name, "Drone Tackle");
    assert_eq!(fit.slot_count(SlotCategory::Low), 1);
    assert_eq!(fit.slot_count(SlotCategory::High), 1);
    assert_eq!(fit.drone_bay[&2456].quantity, 5);
}

#[test]
fn tengu_fixture_has_subsystems() {
    let catalog = fixture_catalog();
    let text = fitting_text("tengu_shield.eft");
    let fit = parse_fitting(&text, &catalog).expect("fixture parses");

    assert_eq!(fit.slot_count(SlotCategory::Sub), 4);
    assert_eq!(fit.slot_count(SlotCategory::Mid), 2);
    assert_eq!(fit.slot_count(SlotCategory::Low), 0);
    assert_eq!(fit.drone_bay[&2456].quantity, 2);

    let json = serde_json::to_value(&fit).expect("serializes");
    assert_eq!(
        json["SubSlot0"]["name"],
        "Tengu Core - Electronic Efficiency Gate"
    );
}

#[test]
fn tengu_ship_skills_are_a_subset_of_fit_skills() {
    let catalog = fixture_catalog();
    let fit = parse_fitting(&fitting_text("tengu_shield.eft"), &catalog).expect("parses");
    let skills = SkillResolver::new(&catalog)
        .resolve_fitting(&fit)
        .expect("resolves");

    assert_eq!(skills.ship_skills.len(), 4);
    for (skill_id, level) in skills.ship_skills.iter() {
        assert!(skills.fit_skills.level(skill_id) >= Some(level));
    }
    assert_eq!(skills.fit_skills.level(3425), Some(4));
    assert_eq!(skills.fit_skills.level(3436), Some(5));
}
