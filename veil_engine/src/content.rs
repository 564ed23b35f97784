//! The authored town manifest: seven NPCs, their routes and conversations,
//! the collectables, the temple-climb checkpoint tables, and the intro video.
//! Everything here is plain data handed to [`veil_runtime::town::Town`]; no
//! behaviour lives in this module.

use std::collections::BTreeMap;

use veil_runtime::animation::{AnimationRoles, ClipConfig};
use veil_runtime::checkpoint::{CheckpointPlan, CheckpointZoneDef, ZoneBox};
use veil_runtime::conversation::{ConversationSet, DialogLine, Speaker};
use veil_runtime::events::Hook;
use veil_runtime::math::{euler_y, vec3, Vec3};
use veil_runtime::mission::MissionCue;
use veil_runtime::movement::{Waypoint, WaypointSet};
use veil_runtime::npc::{NpcConfig, NpcVisual};
use veil_runtime::town::{CollectableSpawn, SceneryDef, TownContent};
use veil_runtime::video::VideoConfig;

pub fn town_content() -> TownContent {
    TownContent {
        scenery: scenery(),
        npcs: vec![
            girl(),
            shop_keeper(),
            temple_shaman(),
            old_lady(),
            doorman(),
            librarian(),
            monster(),
        ],
        girl_house_zone: ZoneBox {
            pos: vec3(34.0, 16.0, 57.0),
            scale: vec3(28.0, 7.0, 32.0),
        },
        candle_spawns: candle_spawns(),
        jar_spawn: spawn_at("emptyJar", -23.65, 11.85, 16.55),
        whisper_spawn: spawn_at("whisper", 1.85, 12.3, 34.0),
        checkpoints: checkpoint_plan(),
        intro_video: VideoConfig {
            src: "videos/toTitleA_medium.mp4".into(),
            wait_before: 3.0,
            wait_after: 3.0,
        },
        intro_exit_pos: vec3(37.5, 21.0, -19.0),
        intro_exit_look_at: vec3(10.0, 27.0, 9.0),
    }
}

// -- building blocks ------------------------------------------------------

fn wp(x: f32, y: f32, z: f32, yaw: f32) -> Waypoint {
    Waypoint {
        position: vec3(x, y, z),
        rotation: euler_y(yaw),
        wait_time: 0.0,
    }
}

fn wp_hold(x: f32, y: f32, z: f32, yaw: f32, wait_time: f32) -> Waypoint {
    Waypoint {
        position: vec3(x, y, z),
        rotation: euler_y(yaw),
        wait_time,
    }
}

fn route(id: &str, move_speed: f32, waypoints: Vec<Waypoint>, on_complete: Vec<Hook>) -> WaypointSet {
    WaypointSet {
        id: id.into(),
        waypoints,
        loop_route: false,
        move_speed,
        on_complete,
    }
}

fn patrol(id: &str, move_speed: f32, waypoints: Vec<Waypoint>) -> WaypointSet {
    WaypointSet {
        id: id.into(),
        waypoints,
        loop_route: true,
        move_speed,
        on_complete: Vec::new(),
    }
}

fn clip(name: &str, looping: bool, speed: f32) -> ClipConfig {
    ClipConfig {
        name: name.into(),
        looping,
        speed,
    }
}

fn npc_says(text: &str, next: Option<&str>) -> DialogLine {
    DialogLine {
        speaker: Speaker::Npc,
        text: text.into(),
        next_dialog_id: next.map(str::to_string),
        actions: Vec::new(),
        player_choices: Vec::new(),
    }
}

fn player_says(text: &str, next: Option<&str>) -> DialogLine {
    DialogLine {
        speaker: Speaker::Player,
        text: text.into(),
        next_dialog_id: next.map(str::to_string),
        actions: Vec::new(),
        player_choices: Vec::new(),
    }
}

fn with_actions(mut line: DialogLine, actions: Vec<Hook>) -> DialogLine {
    line.actions = actions;
    line
}

fn conversation(
    id: &str,
    start: &str,
    lines: Vec<(&str, DialogLine)>,
    on_complete: Vec<Hook>,
) -> ConversationSet {
    let dialogs: BTreeMap<String, DialogLine> = lines
        .into_iter()
        .map(|(key, line)| (key.to_string(), line))
        .collect();
    ConversationSet {
        id: id.into(),
        start_dialog_id: start.into(),
        dialogs,
        on_complete,
    }
}

fn start_route(npc: &str, set: &str) -> Hook {
    Hook::StartWaypointSet {
        npc: npc.into(),
        set: set.into(),
    }
}

fn prepare(npc: &str, set: &str) -> Hook {
    Hook::PrepareConversation {
        npc: npc.into(),
        set: set.into(),
    }
}

fn restart_clip(npc: &str, clip: &str) -> Hook {
    Hook::PlayAnimation {
        npc: npc.into(),
        clip: clip.into(),
        restart: true,
    }
}

fn cue(cue: MissionCue) -> Hook {
    Hook::Mission { cue }
}

fn emote(id: &str) -> Hook {
    Hook::TriggerEmote { emote: id.into() }
}

fn met(npc: &str) -> Hook {
    Hook::Mission {
        cue: MissionCue::Met { npc: npc.into() },
    }
}

fn spawn_at(name: &str, x: f32, y: f32, z: f32) -> CollectableSpawn {
    CollectableSpawn {
        name: name.into(),
        pos: vec3(x, y, z),
        rotation: euler_y(0.0),
        scale: vec3(1.0, 1.0, 1.0),
    }
}

fn zone(pos: Vec3, scale: Vec3) -> ZoneBox {
    ZoneBox { pos, scale }
}

// -- the girl -------------------------------------------------------------

fn girl() -> NpcConfig {
    NpcConfig {
        id: "girl".into(),
        name: "Girl".into(),
        start_position: vec3(30.0, 12.8, 54.5),
        start_rotation: euler_y(180.0),
        visual: NpcVisual::Model {
            src: "models/char/theGirl.glb".into(),
        },
        clickable: true,
        hover_text: Some("Talk to Girl".into()),
        proximity_radius: Some(4.0),
        on_proximity: Vec::new(),
        animations: vec![
            clip("Walking", true, 1.0),
            clip("Walking_Woman", true, 1.2),
            clip("Talk_with_Left_Hand_Raised", true, 1.0),
            clip("Talk_with_Hands_Open", true, 1.0),
            clip("Running", false, 1.0),
            clip("Jump_Run", true, 1.0),
            clip("Jump_Over_Obstacle_2", false, 1.0),
            clip("Idle", true, 1.0),
            clip("Idle_7", false, 1.0),
            clip("Idle_6", false, 1.0),
        ],
        default_animation: Some("Walking".into()),
        roles: AnimationRoles {
            idle: Some("Idle".into()),
            walk: Some("Walking_Woman".into()),
            run: Some("Running".into()),
            talk: Some("Talk_with_Hands_Open".into()),
        },
        waypoint_sets: girl_routes(),
        conversation_sets: girl_conversations(),
        flavor_lines: vec![
            "Hi there...".into(),
            "I don't have time to talk right now.".into(),
            "It's a spooky day, isn't it?".into(),
            "Have you seen my cat?".into(),
        ],
        items_to_give: vec!["key".into()],
    }
}

fn girl_routes() -> Vec<WaypointSet> {
    vec![
        route(
            "runOutOfHouse",
            3.5,
            vec![
                wp(32.3, 12.8, 51.5, 180.0),
                wp(32.25, 12.35, 44.5, 180.0),
            ],
            vec![
                restart_clip("girl", "Talk_with_Hands_Open"),
                prepare("girl", "firstMeeting"),
            ],
        ),
        route(
            "walkToFountain",
            3.5,
            vec![
                wp(30.3, 12.3, 41.6, 215.0),
                wp(28.85, 12.25, 38.2, 215.0),
                wp(24.25, 12.25, 35.75, 215.0),
                wp(20.3, 12.15, 34.8, 215.0),
                wp(17.15, 12.15, 31.15, 270.0),
                wp(13.85, 12.25, 23.9, 270.0),
                wp(4.1, 12.1, 19.8, 90.0),
                wp(4.25, 12.6, 15.65, 270.0),
                wp(2.2, 12.6, 11.65, 154.0),
            ],
            vec![prepare("girl", "atFountain")],
        ),
        route(
            "walkToChurch",
            3.5,
            vec![
                wp(9.0, 12.6, 6.0, 0.0),
                wp(12.8, 12.6, 12.3, 80.0),
                wp(18.75, 12.6, 12.5, 80.0),
                wp(24.5, 15.55, 11.9, 285.0),
            ],
            vec![
                start_route("girl", "searchInsideChurch"),
                restart_clip("girl", "Idle"),
            ],
        ),
        patrol(
            "searchInsideChurch",
            1.5,
            vec![
                wp(29.75, 15.65, 12.1, 165.0),
                wp(33.0, 15.55, 14.25, 45.0),
                wp(38.25, 15.75, 13.65, 115.0),
                wp(37.6, 15.75, 18.1, 15.0),
                wp(32.3, 15.55, 16.0, 245.0),
                wp(26.45, 15.65, 16.45, 275.0),
            ],
        ),
        route(
            "endTheSearch",
            4.0,
            vec![wp(32.5, 15.55, 15.0, 265.0)],
            vec![prepare("girl", "afterCandlesCollected")],
        ),
        route(
            "walkToShop",
            3.5,
            vec![
                wp(24.0, 15.6, 13.45, 254.0),
                wp(18.6, 12.58, 12.65, 266.0),
                wp(12.0, 12.58, 13.4, 318.0),
                wp(5.25, 12.55, 16.4, 330.0),
                wp(2.85, 12.1, 19.4, 288.0),
                wp(-5.1, 11.9, 14.65, 238.0),
                wp(-14.4, 10.85, 7.45, 292.0),
                wp(-18.75, 11.1, 11.1, 65.0),
            ],
            vec![prepare("girl", "gotToShop")],
        ),
        route(
            "walkToGraveyard",
            3.5,
            vec![
                wp(-14.23, 10.86, 7.5, 48.0),
                wp(-9.1, 11.45, 11.45, 48.5),
                wp(-3.75, 12.1, 15.1, 55.0),
                wp(4.4, 12.1, 20.0, 318.0),
            ],
            vec![
                cue(MissionCue::ArrivedAtGraveyard),
                prepare("girl", "optionalGraveyardAssist"),
            ],
        ),
        route(
            "walkIntoGraveyard",
            3.5,
            vec![wp(1.7, 11.75, 23.55, 333.0)],
            vec![start_route("girl", "distractShadows")],
        ),
        patrol(
            "distractShadows",
            6.0,
            vec![
                wp(6.55, 11.9, 26.0, 77.0),
                wp(10.7, 12.1, 27.75, 352.0),
                wp(8.15, 12.0, 32.0, 288.0),
                wp(2.8, 11.5, 35.7, 297.0),
                wp(-7.4, 10.4, 33.15, 235.0),
                wp(-10.45, 11.3, 23.15, 216.0),
                wp(-7.2, 11.7, 20.0, 76.0),
                wp(2.0, 11.7, 24.0, 62.0),
            ],
        ),
        route(
            "runOutOfGraveyard",
            6.0,
            vec![
                wp(1.7, 11.75, 23.55, 333.0),
                wp(2.7, 12.1, 20.3, 115.0),
            ],
            vec![prepare("girl", "thatWasClose")],
        ),
        route(
            "backToTheShop",
            6.0,
            vec![
                wp(-5.1, 11.9, 14.65, 238.0),
                wp(-14.4, 10.85, 7.45, 292.0),
                wp(-17.6, 11.1, 12.4, 321.0),
                wp(-20.65, 11.25, 16.0, 308.0),
                wp(-22.3, 11.25, 17.7, 262.0),
            ],
            vec![prepare("shopKeeper", "returnTheWhisper")],
        ),
        route(
            "outsideTheShop",
            3.5,
            vec![
                wp(-20.65, 11.25, 16.0, 137.0),
                wp(-17.6, 11.1, 12.4, 137.0),
                wp(-14.7, 10.85, 7.65, 204.0),
            ],
            vec![prepare("girl", "lookAtApartments")],
        ),
        route(
            "toTheApartmentBuilding",
            3.5,
            vec![
                wp(-16.85, 10.2, 3.8, 207.0),
                wp(-20.0, 10.15, -3.85, 202.0),
            ],
            Vec::new(),
        ),
    ]
}

fn girl_conversations() -> Vec<ConversationSet> {
    vec![
        conversation(
            "firstMeeting",
            "girl1",
            vec![
                (
                    "girl1",
                    npc_says(
                        "Hello! I\u{2019}m sorry to bother you, but I need help!",
                        Some("player1"),
                    ),
                ),
                (
                    "player1",
                    player_says("What's wrong? How can I help?", Some("girl2")),
                ),
                (
                    "girl2",
                    npc_says(
                        "This isn\u{2019}t my city \u{2014} I don\u{2019}t know what\u{2019}s happening or how I got here. Please, help me find a way out.",
                        Some("player2"),
                    ),
                ),
                (
                    "player2",
                    player_says(
                        "I ended up here by accident too. I\u{2019}ll help you. Do you know anything about this place?",
                        Some("girl3"),
                    ),
                ),
                (
                    "girl3",
                    npc_says(
                        "It\u{2019}s strange\u{2026} It looks a bit like the city I know, but this one feels empty. Dead. Let\u{2019}s go check it out some more.",
                        None,
                    ),
                ),
            ],
            vec![cue(MissionCue::FirstMeetingComplete)],
        ),
        conversation(
            "atFountain",
            "fountain1",
            vec![
                (
                    "fountain1",
                    npc_says("What day is it today?", Some("player_answer")),
                ),
                (
                    "player_answer",
                    player_says("It's October 27th", Some("fountain2")),
                ),
                (
                    "fountain2",
                    npc_says(
                        "October 27\u{2026} the night when the veil grows thin  when the gate to the Spirit Realm opens, and the souls of animals return to those who remember them.",
                        Some("fountain3"),
                    ),
                ),
                (
                    "fountain3",
                    npc_says(
                        "My cat\u{2026} she always found me, no matter where I was. If we perform the ritual, she\u{2019}ll come - and she\u{2019}ll help us find the way out.",
                        Some("player_question"),
                    ),
                ),
                ("player_question", player_says("A ritual?", Some("fountain4"))),
                (
                    "fountain4",
                    npc_says(
                        "Yes. But we\u{2019}ll need to prepare everything first\u{2026}",
                        Some("fountain5"),
                    ),
                ),
                (
                    "fountain5",
                    npc_says(
                        "I know... CANDLES! There should be some in the church.",
                        None,
                    ),
                ),
            ],
            vec![cue(MissionCue::RitualPlanned)],
        ),
        conversation(
            "afterCandlesCollected",
            "postCandles1",
            vec![
                (
                    "postCandles1",
                    npc_says(
                        "Great job! Hang onto those candles. We need them for the ritual.",
                        Some("postCandles2"),
                    ),
                ),
                (
                    "postCandles2",
                    npc_says(
                        "The next thing we for the ritual is my cat's favorite food.",
                        Some("postCandles3"),
                    ),
                ),
                (
                    "postCandles3",
                    npc_says(
                        "That was Happy Murmur. Do you think they would have that at the shop?",
                        Some("player_response"),
                    ),
                ),
                (
                    "player_response",
                    player_says("Let's go check it out.", None),
                ),
            ],
            vec![cue(MissionCue::CandlesDelivered)],
        ),
        conversation(
            "gotToShop",
            "postCandles1",
            vec![(
                "postCandles1",
                npc_says(
                    "I don't like the look of this shop... it's creepy. I'll wait here while you go in and get the food.",
                    None,
                ),
            )],
            vec![cue(MissionCue::WaitingOutsideShop)],
        ),
        conversation(
            "tellAboutJar",
            "haveJar1",
            vec![
                (
                    "haveJar1",
                    player_says(
                        "That was weird. He won't take my money. He says we need a whisper from the graveyard.",
                        Some("girlJar1"),
                    ),
                ),
                (
                    "girlJar1",
                    npc_says(
                        "Well, we don't have much time. We need to get the food and perform the ritual.",
                        Some("haveJar2"),
                    ),
                ),
                (
                    "haveJar2",
                    player_says(
                        "He gave me this jar to collect the whisper. Let's get this over with...",
                        None,
                    ),
                ),
            ],
            vec![cue(MissionCue::PrepareTheGraveyard)],
        ),
        conversation(
            "optionalGraveyardAssist",
            "assist1",
            vec![
                (
                    "assist1",
                    npc_says(
                        "I don't like the look of those shadows swirling around in there. Stay away from them.",
                        Some("assist2"),
                    ),
                ),
                (
                    "assist2",
                    npc_says(
                        "I know... I will distract them while you collect the whisper.",
                        None,
                    ),
                ),
            ],
            vec![start_route("girl", "walkIntoGraveyard")],
        ),
        conversation(
            "thatWasClose",
            "close1",
            vec![(
                "close1",
                npc_says("That was close! We need to get back to the shop.", None),
            )],
            vec![emote("fistpump"), cue(MissionCue::ThatWasClose)],
        ),
        conversation(
            "lookAtApartments",
            "lookAt1",
            vec![
                (
                    "lookAt1",
                    npc_says(
                        "I need to write a letter for the ritual. We will need a paper and a pen.",
                        Some("lookAt2"),
                    ),
                ),
                (
                    "lookAt2",
                    npc_says(
                        "If this is anything like the city I know, there should be a writer that lives in that building right there.",
                        Some("playerLook1"),
                    ),
                ),
                ("playerLook1", player_says("The tall one?", Some("lookAt3"))),
                (
                    "lookAt3",
                    npc_says(
                        "Yep. I just need to remember which apartment she lives in. I know it was on the top floor.",
                        None,
                    ),
                ),
            ],
            vec![cue(MissionCue::WriterLead)],
        ),
    ]
}

// -- the shop keeper ------------------------------------------------------

fn shop_keeper() -> NpcConfig {
    NpcConfig {
        id: "shopKeeper".into(),
        name: "Shop Keeper".into(),
        start_position: vec3(-25.0, 11.25, 17.5),
        start_rotation: euler_y(150.0),
        visual: NpcVisual::Model {
            src: "models/char/shopkeepA.glb".into(),
        },
        clickable: true,
        hover_text: Some("Talk to ShopKeeper".into()),
        proximity_radius: Some(4.0),
        on_proximity: Vec::new(),
        animations: vec![
            clip("Walking", true, 1.0),
            clip("Talk_with_Left_Hand_on_Hip", true, 1.2),
            clip("Talk_with_Hands_Open", true, 1.0),
            clip("Talk_Passionately", true, 1.0),
            clip("Shrug", false, 1.0),
            clip("Running", true, 1.0),
            clip("Male_Bend_Over_Pick_Up", false, 1.0),
            clip("Idle_9", true, 1.0),
            clip("Checkout_Gesture", false, 1.0),
        ],
        default_animation: Some("Talk_Passionately".into()),
        roles: AnimationRoles {
            idle: Some("Idle_9".into()),
            walk: Some("Walking".into()),
            run: Some("Running".into()),
            talk: Some("Talk_Passionately".into()),
        },
        waypoint_sets: vec![
            route(
                "walkToCounter",
                2.0,
                vec![
                    wp_hold(-23.0, 6.0, 18.0, 90.0, 2.0),
                    wp(-23.0, 6.0, 16.0, 180.0),
                ],
                Vec::new(),
            ),
            route(
                "walkToStorage",
                2.0,
                vec![
                    wp_hold(-26.0, 6.0, 16.0, 270.0, 1.0),
                    wp(-23.0, 6.0, 16.0, 180.0),
                ],
                Vec::new(),
            ),
        ],
        conversation_sets: vec![
            conversation(
                "initialShopTalk",
                "shop1",
                vec![
                    (
                        "shop1",
                        npc_says("Hello! Looking for supplies?", Some("player1")),
                    ),
                    (
                        "player1",
                        player_says(
                            "Yes, we need a can of Happy Murmur cat food. Do you have that?",
                            Some("shop2"),
                        ),
                    ),
                    (
                        "shop2",
                        npc_says("It just so happens I have one can left.", Some("player2")),
                    ),
                    (
                        "player2",
                        player_says(
                            "How much does it cost? (pulling out some coins)",
                            Some("shop3"),
                        ),
                    ),
                    (
                        "shop3",
                        npc_says(
                            "We don't trade in coins here. Our currency is memory, breath, and whispers of the lost.",
                            Some("shop4"),
                        ),
                    ),
                    (
                        "shop4",
                        npc_says(
                            "Bring me a whisper from the graveyard \u{2014} the voice of one who won't rest. Then we'll talk.",
                            Some("shop5"),
                        ),
                    ),
                    (
                        "shop5",
                        npc_says(
                            "Use this to catch it\u{2026} but be careful \u{2014} the dead don't like to be disturbed.",
                            None,
                        ),
                    ),
                ],
                vec![cue(MissionCue::ShopKeeperGivingJar)],
            ),
            conversation(
                "returnTheWhisper",
                "whisper1",
                vec![
                    (
                        "whisper1",
                        npc_says(
                            "Well, I didn't expect to see you again. Did you bring the whisper?",
                            Some("playerWhisper1"),
                        ),
                    ),
                    (
                        "playerWhisper1",
                        player_says(
                            "Guess you underestimated us. We got the whisper.",
                            Some("whisper2"),
                        ),
                    ),
                    (
                        "whisper2",
                        npc_says(
                            "Fair enough. Here's your can of Happy Murmur.",
                            Some("whisper3"),
                        ),
                    ),
                    (
                        "whisper3",
                        npc_says(
                            "Best of luck on your journey. May the spirits guide you.",
                            None,
                        ),
                    ),
                ],
                vec![cue(MissionCue::CatFoodSecured)],
            ),
        ],
        flavor_lines: vec![
            "Welcome to my shop!".into(),
            "Looking for something?".into(),
            "Sorry, we're out of stock on that.".into(),
        ],
        items_to_give: Vec::new(),
    }
}

// -- side characters ------------------------------------------------------

fn temple_shaman() -> NpcConfig {
    NpcConfig {
        id: "templeShaman".into(),
        name: "Temple Shaman".into(),
        start_position: vec3(-32.25, 45.35, 59.0),
        start_rotation: euler_y(180.0),
        visual: NpcVisual::Avatar {
            body_shape: "urn:decentraland:off-chain:base-avatars:BaseMale".into(),
            wearables: vec![
                "urn:decentraland:off-chain:base-avatars:brown_pants".into(),
                "urn:decentraland:off-chain:base-avatars:blue_tshirt".into(),
            ],
        },
        clickable: true,
        hover_text: Some("Talk to Temple Shaman".into()),
        proximity_radius: Some(4.0),
        on_proximity: Vec::new(),
        animations: Vec::new(),
        default_animation: None,
        roles: AnimationRoles::default(),
        waypoint_sets: vec![
            route(
                "walkToAltar",
                1.5,
                vec![
                    wp_hold(-32.0, 39.0, 52.0, 90.0, 2.0),
                    wp(-34.0, 39.0, 54.0, 0.0),
                ],
                Vec::new(),
            ),
            route(
                "walkToEntrance",
                1.5,
                vec![
                    wp_hold(-34.0, 39.0, 48.0, 180.0, 1.0),
                    wp(-34.0, 39.0, 52.0, 0.0),
                ],
                Vec::new(),
            ),
        ],
        conversation_sets: vec![conversation(
            "blessing",
            "shaman1",
            vec![
                (
                    "shaman1",
                    npc_says("Welcome, traveler. You seek guidance?", Some("player1")),
                ),
                (
                    "player1",
                    player_says(
                        "Yes, what can you tell me about this place?",
                        Some("shaman2"),
                    ),
                ),
                (
                    "shaman2",
                    with_actions(
                        npc_says("The temple holds many secrets. Tread carefully.", None),
                        vec![met("templeShaman")],
                    ),
                ),
            ],
            Vec::new(),
        )],
        flavor_lines: vec![
            "Peace be with you.".into(),
            "The spirits are restless tonight.".into(),
            "Meditate and find clarity.".into(),
        ],
        items_to_give: Vec::new(),
    }
}

fn old_lady() -> NpcConfig {
    NpcConfig {
        id: "oldLady".into(),
        name: "Old Lady".into(),
        start_position: vec3(-27.0, 10.55, 2.5),
        start_rotation: euler_y(0.0),
        visual: NpcVisual::Model {
            src: "models/char/oldLadyA.glb".into(),
        },
        clickable: true,
        hover_text: Some("Talk to Old Lady".into()),
        proximity_radius: Some(4.0),
        on_proximity: Vec::new(),
        animations: vec![
            clip("Walking", true, 1.0),
            clip("open_door", true, 1.2),
            clip("Sitting_Answering_Questions", true, 1.0),
            clip("Sit_and_Drink", true, 1.0),
            clip("Running", false, 1.0),
            clip("Elderly_Shaky_Walk_inplace", true, 1.0),
            clip("Idle_4", true, 1.0),
        ],
        default_animation: Some("Idle_4".into()),
        roles: AnimationRoles {
            idle: Some("Idle_4".into()),
            walk: Some("Elderly_Shaky_Walk_inplace".into()),
            run: Some("Running".into()),
            talk: Some("Idle_4".into()),
        },
        waypoint_sets: vec![
            route(
                "walkToBench",
                1.0,
                vec![
                    wp_hold(-24.0, 6.0, 1.0, 90.0, 3.0),
                    wp(-26.0, 6.0, 1.0, 0.0),
                ],
                Vec::new(),
            ),
            route(
                "walkToGarden",
                1.0,
                vec![
                    wp_hold(-26.0, 6.0, 4.0, 180.0, 2.0),
                    wp(-26.0, 6.0, 1.0, 0.0),
                ],
                Vec::new(),
            ),
        ],
        conversation_sets: vec![conversation(
            "wisdom",
            "lady1",
            vec![
                (
                    "lady1",
                    npc_says(
                        "I remember when this town was different...",
                        Some("player1"),
                    ),
                ),
                (
                    "player1",
                    player_says("What was it like?", Some("lady2")),
                ),
                (
                    "lady2",
                    with_actions(
                        npc_says("Full of life and laughter. Now... it's changed.", None),
                        vec![met("oldLady")],
                    ),
                ),
            ],
            Vec::new(),
        )],
        flavor_lines: vec![
            "Good day, dear.".into(),
            "My bones ache today.".into(),
            "The weather is nice, isn't it?".into(),
        ],
        items_to_give: Vec::new(),
    }
}

fn doorman() -> NpcConfig {
    NpcConfig {
        id: "doorman".into(),
        name: "Doorman".into(),
        start_position: vec3(-21.75, 10.1, -1.75),
        start_rotation: euler_y(0.0),
        visual: NpcVisual::Model {
            src: "models/char/oldManA1.glb".into(),
        },
        clickable: true,
        hover_text: Some("Talk to Doorman".into()),
        proximity_radius: Some(4.0),
        on_proximity: Vec::new(),
        // The model only ships a walk cycle; there is no idle clip to default
        // to, and the role names below stay unmatched so the selector leaves
        // the pose alone.
        animations: vec![clip("Walking", true, 1.0)],
        default_animation: None,
        roles: AnimationRoles {
            idle: Some("idle".into()),
            walk: Some("walk".into()),
            run: Some("run".into()),
            talk: Some("talk".into()),
        },
        waypoint_sets: vec![
            patrol(
                "patrolArea",
                1.5,
                vec![
                    wp_hold(-26.0, 6.0, 8.0, 180.0, 2.0),
                    wp_hold(-26.0, 6.0, 5.0, 0.0, 2.0),
                ],
            ),
            route(
                "walkToGate",
                2.0,
                vec![
                    wp_hold(-26.0, 6.0, 10.0, 180.0, 1.0),
                    wp(-26.0, 6.0, 5.0, 0.0),
                ],
                Vec::new(),
            ),
        ],
        conversation_sets: vec![conversation(
            "greeting",
            "door1",
            vec![
                (
                    "door1",
                    npc_says("Welcome. I guard this entrance.", Some("player1")),
                ),
                (
                    "player1",
                    with_actions(
                        player_says("Nice to meet you.", None),
                        vec![met("doorman")],
                    ),
                ),
            ],
            Vec::new(),
        )],
        flavor_lines: vec![
            "Move along, please.".into(),
            "I'm watching this area.".into(),
            "Nothing to see here.".into(),
        ],
        items_to_give: Vec::new(),
    }
}

fn librarian() -> NpcConfig {
    NpcConfig {
        id: "librarian".into(),
        name: "Librarian".into(),
        start_position: vec3(-53.0, 27.25, 21.5),
        start_rotation: euler_y(110.0),
        visual: NpcVisual::Avatar {
            body_shape: "urn:decentraland:off-chain:base-avatars:BaseFemale".into(),
            wearables: vec![
                "urn:decentraland:off-chain:base-avatars:brown_pants".into(),
                "urn:decentraland:off-chain:base-avatars:blue_tshirt".into(),
            ],
        },
        clickable: true,
        hover_text: Some("Talk to Librarian".into()),
        proximity_radius: Some(4.0),
        on_proximity: Vec::new(),
        animations: Vec::new(),
        default_animation: None,
        roles: AnimationRoles::default(),
        waypoint_sets: vec![
            route(
                "walkToShelves",
                1.5,
                vec![
                    wp_hold(-24.0, 6.0, 1.0, 90.0, 2.0),
                    wp(-26.0, 6.0, 1.0, 0.0),
                ],
                Vec::new(),
            ),
            route(
                "walkToDesk",
                1.5,
                vec![
                    wp_hold(-26.0, 6.0, 4.0, 180.0, 1.0),
                    wp(-26.0, 6.0, 1.0, 0.0),
                ],
                Vec::new(),
            ),
        ],
        conversation_sets: vec![conversation(
            "librarianTalk",
            "librarian1",
            vec![
                (
                    "librarian1",
                    npc_says("Hello! How can I help you today?", Some("player1")),
                ),
                (
                    "player1",
                    player_says(
                        "I'm looking for a book about the history of this town.",
                        Some("librarian2"),
                    ),
                ),
                (
                    "librarian2",
                    with_actions(
                        npc_says(
                            "Ah yes, we have several books on local history. Let me show you.",
                            None,
                        ),
                        vec![met("librarian")],
                    ),
                ),
            ],
            Vec::new(),
        )],
        flavor_lines: vec![
            "Welcome to the library.".into(),
            "Please keep quiet.".into(),
            "All books must be returned in two weeks.".into(),
        ],
        items_to_give: Vec::new(),
    }
}

fn monster() -> NpcConfig {
    NpcConfig {
        id: "monster".into(),
        name: "monster".into(),
        start_position: vec3(14.25, 12.6, 11.5),
        start_rotation: euler_y(319.0),
        visual: NpcVisual::Model {
            src: "models/char/monsterA.glb".into(),
        },
        clickable: false,
        hover_text: Some("YOU BETTER RUN!".into()),
        proximity_radius: Some(4.0),
        on_proximity: Vec::new(),
        animations: vec![
            clip("Walking", true, 1.0),
            clip("Zombie_Scream", true, 1.2),
            clip("Unsteady_Walk", true, 1.0),
            clip("Female_Run_Forward_Pick_Up_Right", true, 1.0),
            clip("Running", false, 1.0),
        ],
        default_animation: Some("Walking".into()),
        roles: AnimationRoles {
            idle: Some("Unsteady_Walk".into()),
            walk: Some("Walking".into()),
            run: Some("Running".into()),
            talk: Some("Zombie_Scream".into()),
        },
        waypoint_sets: vec![
            route(
                "shambleToFountain",
                1.5,
                vec![
                    wp_hold(10.5, 12.5, 11.0, 280.0, 2.0),
                    wp(14.25, 12.6, 11.5, 319.0),
                ],
                Vec::new(),
            ),
        ],
        conversation_sets: Vec::new(),
        flavor_lines: Vec::new(),
        items_to_give: Vec::new(),
    }
}

// -- collectables and zones -----------------------------------------------

fn candle_spawns() -> Vec<CollectableSpawn> {
    // Seven candles along the church shelf, half a meter apart.
    vec![
        spawn_at("candle17", 22.25, 16.0, 15.0),
        spawn_at("candle18", 22.25, 16.0, 14.5),
        spawn_at("candle19", 22.25, 16.0, 14.0),
        spawn_at("candle21", 22.25, 16.0, 13.5),
        spawn_at("candle17", 22.25, 16.0, 13.0),
        spawn_at("candle20", 22.25, 16.0, 12.5),
        spawn_at("candle21", 22.25, 16.0, 12.0),
    ]
}

fn cp(
    name: &str,
    pos: Vec3,
    side: f32,
    respawn_pos: Vec3,
    respawn_look_at: Vec3,
) -> CheckpointZoneDef {
    CheckpointZoneDef {
        name: name.into(),
        pos,
        scale: vec3(side, side, side),
        respawn_pos,
        respawn_look_at,
    }
}

fn checkpoint_plan() -> CheckpointPlan {
    CheckpointPlan {
        up: vec![
            cp(
                "topOfTunnel",
                vec3(-46.95, 32.0, -26.75),
                14.0,
                vec3(-46.0, 28.0, -23.4),
                vec3(-47.8, 29.87, 11.3),
            ),
            cp(
                "topOfBoneBridge",
                vec3(-47.8, 29.87, 11.3),
                10.0,
                vec3(-44.5, 27.0, 14.9),
                vec3(17.0, 34.0, 50.25),
            ),
            cp(
                "endOfRun",
                vec3(17.0, 34.0, 50.25),
                6.0,
                vec3(18.8, 33.0, 51.1),
                vec3(1.75, 40.0, 58.0),
            ),
            cp(
                "landingD",
                vec3(1.75, 40.0, 58.0),
                6.0,
                vec3(2.65, 39.0, 59.5),
                vec3(-10.75, 42.0, 55.0),
            ),
            cp(
                "landingC",
                vec3(-10.75, 42.0, 55.0),
                6.0,
                vec3(-10.6, 41.0, 56.6),
                vec3(-23.0, 44.0, 31.6),
            ),
            cp(
                "landingB",
                vec3(-23.0, 44.0, 31.6),
                6.0,
                vec3(-21.4, 43.0, 29.75),
                vec3(-44.5, 46.0, 39.5),
            ),
            cp(
                "landingA",
                vec3(-44.5, 46.0, 39.5),
                6.0,
                vec3(-46.75, 45.0, 37.5),
                vec3(-39.5, 46.0, 53.0),
            ),
        ],
        down: vec![
            cp(
                "templeLanding",
                vec3(-39.5, 46.0, 53.0),
                6.0,
                vec3(-34.5, 45.0, 54.0),
                vec3(-44.5, 46.0, 39.5),
            ),
            cp(
                "landingA",
                vec3(-44.5, 46.0, 39.5),
                6.0,
                vec3(-46.75, 45.0, 39.25),
                vec3(-23.0, 44.0, 31.6),
            ),
            cp(
                "landingB",
                vec3(-23.0, 44.0, 31.6),
                6.0,
                vec3(-23.0, 43.0, 28.65),
                vec3(-10.75, 42.0, 55.0),
            ),
            cp(
                "landingC",
                vec3(-10.75, 42.0, 55.0),
                6.0,
                vec3(-12.7, 41.0, 54.9),
                vec3(1.75, 40.0, 58.0),
            ),
            cp(
                "landingD",
                vec3(1.75, 40.0, 58.0),
                6.0,
                vec3(-0.25, 39.0, 58.75),
                vec3(17.0, 34.0, 50.25),
            ),
            cp(
                "bottomOfStairs",
                vec3(17.0, 34.0, 50.25),
                6.0,
                vec3(18.65, 33.0, 50.85),
                vec3(-35.85, 30.0, 16.0),
            ),
            cp(
                "libraryEndOfRun",
                vec3(-35.85, 30.0, 16.0),
                14.0,
                vec3(-43.3, 27.0, 17.0),
                vec3(-46.95, 32.0, -26.75),
            ),
        ],
        reverse_up: zone(vec3(-39.5, 46.0, 53.0), vec3(6.0, 6.0, 6.0)),
        reverse_down: zone(vec3(-46.0, 30.0, -23.4), vec3(8.0, 8.0, 8.0)),
        fall: zone(vec3(0.0, 10.0, 0.0), vec3(160.0, 20.0, 160.0)),
        fall_upper_pos: vec3(0.0, 22.0, 0.0),
        upper_toggle: zone(vec3(1.75, 40.0, 58.0), vec3(6.0, 6.0, 6.0)),
        upper_toggle_alt_pos: vec3(11.82, 36.0, 58.3),
        disable: zone(vec3(-60.0, 30.0, -37.5), vec3(6.0, 6.0, 6.0)),
    }
}

// -- scenery --------------------------------------------------------------

fn piece(name: &str, src: &str, x: f32, y: f32, z: f32, yaw: f32) -> SceneryDef {
    SceneryDef {
        name: name.into(),
        src: src.into(),
        pos: vec3(x, y, z),
        rotation: euler_y(yaw),
        scale: vec3(1.0, 1.0, 1.0),
    }
}

fn scenery() -> Vec<SceneryDef> {
    vec![
        piece("terrainPaths", "models/final/lowerTerrainB_paths.gltf", 0.0, 10.0, 0.0, 180.0),
        piece("cliffs", "models/final/cliffsB.gltf", 0.0, 10.0, 0.0, 180.0),
        piece("playerHouseLevel", "models/final/playerHouseLevelB.gltf", 0.0, 10.0, 0.0, 180.0),
        piece("templeRun", "models/final/templeRunB.gltf", 0.0, 10.0, 0.0, 180.0),
        piece("skyBlocker", "models/final/skyBlockerB.gltf", 0.0, 60.0, 0.0, 0.0),
        piece("boneBridgeLanding", "models/final/boneBridgeLandingB.gltf", 0.0, 10.0, 0.0, 180.0),
        piece("boneBridge", "models/final/boneBridgeB.gltf", 0.0, 10.0, 0.0, 180.0),
        piece("playerHouseStairs", "models/final/tempPlayerHouseStairsB.gltf", 0.0, 10.0, 0.0, 180.0),
        piece("cemeteryWall", "models/final/cemetaryWall_overallB.gltf", 2.6, 11.85, 22.0, 335.0),
        piece("fountain", "models/final/origBuildings/fountain.glb", 7.5, 12.5, 11.125, 0.0),
        piece("apartments", "models/final/buildingReworks/apartment_reworkB.glb", -25.5, 10.0, -11.0, 30.0),
        piece("playerHouse", "models/final/origBuildings/playerHouse.glb", 42.0, 18.5, -26.0, 330.0),
        piece("girlHouse", "models/final/origBuildings/girlHouse.glb", 34.0, 12.25, 57.0, 190.0),
        piece("library", "models/final/origBuildings/library.glb", -63.0, 24.25, 27.0, 125.0),
        piece("temple", "models/final/origBuildings/temple.glb", -33.5, 43.75, 65.0, 180.0),
        piece("shop", "models/final/origBuildings/shop.glb", -22.0, 10.5, 16.5, 145.0),
        piece("church", "models/final/origBuildings/church.glb", 36.0, 13.0, 15.5, -100.0),
        piece("townHall", "models/final/origBuildings/townHall.glb", 7.5, 11.4, -9.0, 0.0),
        piece("coffinBase", "models/ch/HWN20_Grave_01.glb", 4.4, 11.6, 31.5, 238.0),
        piece("coffinLid", "models/ch/HWN20_Grave_02.glb", 1.85, 11.3, 34.0, 182.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_validates() {
        assert!(town_content().validate().is_ok());
    }

    #[test]
    fn manifest_round_trips_through_json() {
        let content = town_content();
        let json = serde_json::to_string(&content).unwrap();
        let back: TownContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }

    #[test]
    fn every_hook_targets_authored_content() {
        let content = town_content();
        let npc_ids: Vec<&str> = content.npcs.iter().map(|n| n.id.as_str()).collect();
        let mut hooks: Vec<&Hook> = Vec::new();
        for npc in &content.npcs {
            for set in &npc.waypoint_sets {
                hooks.extend(set.on_complete.iter());
            }
            for set in &npc.conversation_sets {
                hooks.extend(set.on_complete.iter());
                for line in set.dialogs.values() {
                    hooks.extend(line.actions.iter());
                }
            }
        }
        for hook in hooks {
            let (npc_id, set_id) = match hook {
                Hook::StartWaypointSet { npc, set } => (npc, Some((set, true))),
                Hook::PrepareConversation { npc, set }
                | Hook::StartConversation { npc, set } => (npc, Some((set, false))),
                Hook::PlayAnimation { npc, .. } => (npc, None),
                Hook::TriggerEmote { .. } | Hook::Mission { .. } => continue,
            };
            assert!(npc_ids.contains(&npc_id.as_str()), "unknown npc {npc_id}");
            let target = content
                .npcs
                .iter()
                .find(|n| &n.id == npc_id)
                .unwrap();
            if let Some((set, is_route)) = set_id {
                let found = if is_route {
                    target.waypoint_sets.iter().any(|s| &s.id == set)
                } else {
                    target.conversation_sets.iter().any(|s| &s.id == set)
                };
                assert!(found, "npc {npc_id} has no set {set}");
            }
        }
    }
}
