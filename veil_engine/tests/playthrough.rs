use anyhow::Result;
use veil_engine::sim::{run_playthrough, Playthrough};
use veil_runtime::conversation::Speaker;
use veil_runtime::math::vec3;
use veil_runtime::mission::MissionState;

#[test]
fn full_story_reaches_the_apartments() -> Result<()> {
    let report = run_playthrough(7, 20_000)?;

    assert_eq!(report.final_state, MissionState::HeadedToApartments);
    assert_eq!(report.final_title, "FIND THE WRITER");
    assert_eq!(report.candles, 7);
    assert!(report.items.has_food);

    let has = |line: &str| report.events.iter().any(|l| l == line);
    assert!(has("town.ready"));
    assert!(has("video.complete videos/toTitleA_medium.mp4"));
    assert!(has("zone.enter girlHouse"));
    assert!(has("waypoint.complete girl walkToFountain"));
    assert!(has("mission.state followingGirl"));
    assert!(has("candle.spawn 7"));
    assert!(has("candle.collected 6 (7/7)"));
    assert!(has("dialog.start shopKeeper initialShopTalk"));
    assert!(has("jar.collected"));
    assert!(has("whisper.collected"));
    assert!(has("mission.title GTFO THIS GRAVEYARD!"));
    assert!(has("player.emote fistpump"));
    assert!(has("item.collected catFood"));
    assert!(has("mission.state headedToApartments"));

    // A clean run never hits a refused transition or a dangling hook.
    for prefix in [
        "mission.refused",
        "hook.unknown",
        "waypoint.missing",
        "dialog.missing",
    ] {
        assert!(
            !report.events.iter().any(|l| l.starts_with(prefix)),
            "unexpected `{prefix}` line in the transcript"
        );
    }
    Ok(())
}

#[test]
fn first_meeting_advances_in_authored_order() -> Result<()> {
    let mut play = Playthrough::new(11, 5_000)?;
    play.finish_intro()?;

    play.town_mut().set_player_position(vec3(34.0, 16.0, 57.0));
    play.tick()?;
    play.run_until("the girl to leave her house", |t| {
        t.npc_has_pending_conversation("girl")
    })?;

    play.town_mut().click_npc("girl");
    let expected = [
        (
            Speaker::Npc,
            "Hello! I\u{2019}m sorry to bother you, but I need help!",
        ),
        (Speaker::Player, "What's wrong? How can I help?"),
        (
            Speaker::Npc,
            "This isn\u{2019}t my city \u{2014} I don\u{2019}t know what\u{2019}s happening or how I got here. Please, help me find a way out.",
        ),
        (
            Speaker::Player,
            "I ended up here by accident too. I\u{2019}ll help you. Do you know anything about this place?",
        ),
        (
            Speaker::Npc,
            "It\u{2019}s strange\u{2026} It looks a bit like the city I know, but this one feels empty. Dead. Let\u{2019}s go check it out some more.",
        ),
    ];
    for (index, (speaker, text)) in expected.iter().enumerate() {
        let dialog = play.town().dialog();
        assert!(dialog.active, "dialog closed early at line {index}");
        assert_eq!(dialog.npc_name, "Girl");
        assert_eq!(dialog.speaker, Some(*speaker));
        assert_eq!(dialog.text, *text);
        assert_eq!(dialog.has_next, index + 1 < expected.len());
        // The story must not move until the last line has been seen.
        assert_eq!(play.town().mission_state(), MissionState::ExploringTown);
        play.town_mut().advance_dialog();
    }

    // Advancing past the terminal line closes the mailbox and releases her.
    assert!(!play.town().dialog().active);
    assert_eq!(play.town().mission_state(), MissionState::FollowingGirl);
    assert_eq!(play.town().mission_title(), "FOLLOW THE GIRL");
    assert_eq!(play.town().npc_route("girl"), Some("walkToFountain"));
    assert_eq!(play.town().events().count_of("dialog.end girl firstMeeting"), 1);
    Ok(())
}

#[test]
fn collectables_before_their_spawn_are_ignored() -> Result<()> {
    let mut play = Playthrough::new(0, 5_000)?;
    play.finish_intro()?;

    play.town_mut().click_candle(0);
    play.town_mut().click_jar();
    play.town_mut().click_whisper();
    play.tick()?;

    assert_eq!(play.town().mission_state(), MissionState::ExploringTown);
    assert_eq!(play.town().candle_count(), 0);
    for line in ["jar.collected", "whisper.collected"] {
        assert!(!play.town().events().contains(line));
    }
    Ok(())
}
