//! Built-in scenario catalog.
//!
//! Static, immutable game content: six vignettes from Dutch history, each
//! with its clues, NPC keyword tables, and year-hint ranges. The catalog is
//! read-only; all mutable progress lives in `GameState`.

use crate::scenario::{Clue, ClueKind, Npc, Scenario, YearHint};
use rand::seq::SliceRandom;

/// Fixed point value for every built-in clue.
pub const CLUE_POINTS: u32 = 10;

/// The immutable set of playable scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// The built-in Dutch history catalog.
    pub fn builtin() -> Self {
        Self {
            scenarios: vec![
                rampjaar(),
                beeldenstorm(),
                gouden_eeuw(),
                bataafse_revolutie(),
                hongerwinter(),
                provo(),
            ],
        }
    }

    /// Build a catalog from explicit scenarios (mainly for tests).
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// The default starting scenario.
    pub fn first(&self) -> &Scenario {
        &self.scenarios[0]
    }

    /// Pick a random scenario.
    pub fn random(&self) -> &Scenario {
        self.scenarios
            .choose(&mut rand::thread_rng())
            .expect("catalog is never empty")
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn clue(
    id: &str,
    kind: ClueKind,
    title: &str,
    description: &str,
    content: &str,
) -> Clue {
    Clue::new(id, kind, title, description, content, CLUE_POINTS)
}

fn rampjaar() -> Scenario {
    Scenario {
        id: "rampjaar".to_string(),
        title: "Het Rampjaar".to_string(),
        period: "Gouden Eeuw Crisis".to_string(),
        target_year: 1672,
        description: "Nederland wordt bedreigd door Frankrijk, Engeland en twee Duitse staten. De Republiek staat op het punt van instorten.".to_string(),
        setting: "Je bevindt je in een belegerde stad tijdens een van de donkerste jaren in de Nederlandse geschiedenis.".to_string(),
        mystery: "Wat is het jaar van deze nationale crisis?".to_string(),
        clues: vec![
            clue(
                "observe_1",
                ClueKind::Observe,
                "Franse troepen",
                "Kijk naar de soldaten buiten de stadsmuren",
                "Franse soldaten in blauwe uniformen marcheren voorbij. Hun banieren tonen de lelie van de Zonnekoning. Ze roepen in het Frans over hun snelle opmars door de Republiek.",
            ),
            clue(
                "listen_1",
                ClueKind::Listen,
                "Gesprek over de stadhouder",
                "Luister naar de burgers bij de poort",
                "Burger 1: \"De jonge prins van Oranje is nu stadhouder geworden!\" Burger 2: \"Willem is nog maar 22, kan hij ons redden van deze ramp?\" Burger 1: \"Hij moet wel, anders zijn we verloren aan de Fransen!\"",
            ),
            clue(
                "read_1",
                ClueKind::Read,
                "Pamflet over de waterlinies",
                "Lees het aanplakbiljet bij het stadhuis",
                "PROCLAMATIE: Op bevel van de Staten van Holland worden de dijken doorgestoken! Het water zal ons beschermen tegen de vijand. Alle burgers moeten hun bezittingen in veiligheid brengen!",
            ),
        ],
        npcs: vec![
            Npc::new(
                "burger_rampjaar",
                "Meester Cornelis",
                "Stadsbestuurder",
                "Een bezorgde regentenzoon die de stad probeert te verdedigen",
                "👨‍💼",
            )
            .with_responses("wat gebeurt er", &[
                "De Fransen zijn onze grenzen overgestoken! Ze hebben al veel steden ingenomen.",
                "Het is een ramp! Drie landen vallen ons tegelijk aan.",
                "De vijanden komen van alle kanten. We hebben nog nooit zo'n crisis meegemaakt.",
            ])
            .with_responses("wie regeert", &[
                "De jonge prins Willem is net stadhouder geworden. Hij is onze laatste hoop.",
                "De Staten van Holland hebben de macht, maar nu kijken ze naar de prins van Oranje.",
                "Johan de Witt is dood... de prins moet ons nu leiden.",
            ])
            .with_responses("oorlog", &[
                "Frankrijk, Engeland en twee Duitse staten vallen ons aan!",
                "De Zonnekoning wil ons vernietigen. Zijn troepen zijn overal.",
                "We vechten voor ons bestaan als vrije republiek.",
            ])
            .with_responses("water", &[
                "We hebben de dijken doorgestoken! Het water is onze redding.",
                "De Hollandse Waterlinie zal de vijand stoppen.",
                "Water is onze beste verdediging tegen de Franse cavalerie.",
            ]),
        ],
        hints: vec![
            YearHint::new(1670, 1674, "Je bent heel dicht bij het juiste jaar! Denk aan het \"Rampjaar\" van de Republiek."),
            YearHint::new(1665, 1679, "Je zit in de goede periode. Dit was het jaar van de grootste crisis voor de Republiek."),
            YearHint::new(1650, 1690, "Je zit in de 17e eeuw, maar denk aan het jaar dat \"rampjaar\" wordt genoemd."),
        ],
    }
}

fn beeldenstorm() -> Scenario {
    Scenario {
        id: "beeldenstorm".to_string(),
        title: "De Beeldenstorm".to_string(),
        period: "Opstand tegen Spanje".to_string(),
        target_year: 1566,
        description: "Protestantse opstandelingen vernielen katholieke beelden en kunstwerken in kerken door de hele Nederlanden.".to_string(),
        setting: "Je staat in een stad waar net een kerk is geplunderd door woedende protestanten.".to_string(),
        mystery: "In welk jaar vond deze religieuze opstand plaats?".to_string(),
        clues: vec![
            clue(
                "observe_2",
                ClueKind::Observe,
                "Vernielde kerkbeelden",
                "Bekijk de schade in de kathedraal",
                "Overal liggen gebroken stukken van heiligenbeelden. Altaren zijn omvergegooid en schilderijen zijn verscheurd. De kerk lijkt wel een slagveld.",
            ),
            clue(
                "listen_2",
                ClueKind::Listen,
                "Calvinistische preek",
                "Luister naar de prediker buiten de stad",
                "Prediker: \"Gij zult geen gesneden beeld maken! De Roomse kerk heeft het volk bedrogen met afgoderij!\" Menigte: \"Weg met de beelden! Zuiver de tempels!\"",
            ),
            clue(
                "read_2",
                ClueKind::Read,
                "Smeekschrift van de edelen",
                "Lees het document bij de stadhouder",
                "Aan Margaretha van Parma: Wij, edelen van de Nederlanden, verzoeken om religieuze tolerantie en het afschaffen van de Inquisitie. Het volk lijdt onder de strenge maatregelen van de koning.",
            ),
        ],
        npcs: vec![
            Npc::new(
                "calvinist_beeldenstorm",
                "Dominee Pieter",
                "Calvinistische prediker",
                "Een vurige protestantse prediker die tegen de katholieke kerk preekt",
                "⛪",
            )
            .with_responses("waarom", &[
                "De Roomse kerk heeft het volk bedrogen met afgoderij!",
                "God verbiedt gesneden beelden. We zuiveren zijn huis!",
                "Te lang heeft de paus ons onderdrukt met valse leer.",
            ])
            .with_responses("beelden", &[
                "Afgoderij! De Bijbel verbiedt het aanbidden van beelden.",
                "Deze stenen afgoden leiden het volk weg van de waarheid.",
                "Christus heeft geen gouden beelden nodig!",
            ])
            .with_responses("kerk", &[
                "De ware kerk heeft geen pracht en praal nodig.",
                "Eenvoud en Gods woord, dat is wat we nodig hebben.",
                "De Roomse kerk is corrupt en moet hervormd worden.",
            ])
            .with_responses("koning", &[
                "Filips wil ons dwingen tot zijn valse geloof!",
                "De Spaanse koning begrijpt onze nood niet.",
                "We zijn geen slaven van Madrid!",
            ]),
        ],
        hints: vec![
            YearHint::new(1564, 1568, "Je bent heel dicht bij het juiste jaar! Dit was het begin van de Nederlandse Opstand."),
            YearHint::new(1560, 1570, "Je zit in de goede periode. Denk aan het jaar van de grote beeldenstorm."),
            YearHint::new(1550, 1580, "Je zit in de 16e eeuw, maar denk aan het jaar van religieuze onrust."),
        ],
    }
}

fn gouden_eeuw() -> Scenario {
    Scenario {
        id: "gouden_eeuw".to_string(),
        title: "De Gouden Eeuw".to_string(),
        period: "Nederlandse Bloeitijd".to_string(),
        target_year: 1642,
        description: "Nederland beleeft zijn grootste bloeiperiode. De VOC beheerst de wereldhandel en Amsterdam is het centrum van de wereldeconomie.".to_string(),
        setting: "Je staat op de kade van Amsterdam, waar VOC-schepen vol met schatten uit de Oost aankomen.".to_string(),
        mystery: "In welk jaar was Nederland op het hoogtepunt van zijn macht?".to_string(),
        clues: vec![
            clue(
                "observe_3",
                ClueKind::Observe,
                "VOC-schepen",
                "Kijk naar de haven vol handelsschepen",
                "Enorme schepen met het VOC-logo lossen hun lading. Zakken vol peper, kaneel en andere specerijen worden uitgeladen. Matrozen vertellen over hun reis naar Batavia.",
            ),
            clue(
                "listen_3",
                ClueKind::Listen,
                "Tulpenhandel",
                "Luister naar de kooplieden op de beurs",
                "Koopman 1: \"Mijn tulpenbollen zijn vandaag weer verdubbeld in waarde!\" Koopman 2: \"Iedereen wil tulpen! Zelfs een eenvoudige bol kost nu meer dan een huis!\"",
            ),
            clue(
                "read_3",
                ClueKind::Read,
                "Rembrandt schilderij",
                "Bekijk het nieuwe schilderij in het gildehuis",
                "Een prachtig groepsportret van de schutterij, geschilderd door meester Rembrandt van Rijn. Het toont de welvaart en trots van de Amsterdamse burgers.",
            ),
        ],
        npcs: vec![
            Npc::new(
                "koopman_gouden_eeuw",
                "Heer Van der Meer",
                "VOC-koopman",
                "Een rijke koopman die handelt met de Oost-Indië",
                "💰",
            )
            .with_responses("welvaart", &[
                "Amsterdam is het centrum van de wereldhandel geworden!",
                "Onze schepen brengen schatten uit de hele wereld.",
                "De Republiek is rijker dan ooit tevoren.",
            ])
            .with_responses("tulpen", &[
                "Tulpen zijn het nieuwe goud! Iedereen wil ze hebben.",
                "Mijn tulpenbollen zijn meer waard dan een heel huis!",
                "De tulpenhandel maakt ons allemaal rijk.",
            ])
            .with_responses("compagnie", &[
                "De VOC beheerst de zeeën! Onze vloot is de grootste ter wereld.",
                "Batavia is ons handelscentrum in de Oost.",
                "De Verenigde Oostindische Compagnie brengt ons grote winsten.",
            ])
            .with_responses("kunst", &[
                "Rembrandt en andere meesters maken prachtige werken!",
                "We kunnen ons de beste kunstenaars veroorloven.",
                "Onze welvaart toont zich in prachtige schilderijen.",
            ]),
        ],
        hints: vec![
            YearHint::new(1640, 1644, "Je bent heel dicht bij het hoogtepunt van de Gouden Eeuw!"),
            YearHint::new(1635, 1650, "Je zit in de goede periode van de Nederlandse bloeitijd."),
            YearHint::new(1600, 1670, "Je zit in de Gouden Eeuw, maar denk aan het absolute hoogtepunt."),
        ],
    }
}

fn bataafse_revolutie() -> Scenario {
    Scenario {
        id: "bataafse_revolutie".to_string(),
        title: "Bataafse Revolutie".to_string(),
        period: "Franse Tijd".to_string(),
        target_year: 1795,
        description: "Met Franse hulp wordt de Republiek omgevormd tot de Bataafse Republiek. Vrijheid, Gelijkheid en Broederschap!".to_string(),
        setting: "Je staat op het Binnenhof waar net de nieuwe republiek is uitgeroepen.".to_string(),
        mystery: "In welk jaar werd de Bataafse Republiek gesticht?".to_string(),
        clues: vec![
            clue(
                "observe_4",
                ClueKind::Observe,
                "Franse soldaten",
                "Kijk naar de soldaten die de stad zijn binnengetrokken",
                "Franse soldaten in blauwe uniformen marcheren door de straten. Ze dragen banieren met \"Liberté, Égalité, Fraternité\" en worden begroet door patriotten.",
            ),
            clue(
                "listen_4",
                ClueKind::Listen,
                "Patriottenlied",
                "Luister naar de zingende menigte",
                "Menigte zingt: \"Vrijheid komt met Franse macht, Oranje-tirannie is weggejaagd! Burgers, staat op voor uw recht, de Republiek wordt nu echt!\"",
            ),
            clue(
                "read_4",
                ClueKind::Read,
                "Proclamatie van de Bataafse Republiek",
                "Lees de aankondiging op het stadhuis",
                "PROCLAMATIE: De Bataafse Republiek is geboren! Alle burgers zijn gelijk voor de wet. De rechten van de mens zijn heilig. Leve de Vrijheid!",
            ),
        ],
        npcs: vec![
            Npc::new(
                "patriot_bataafse",
                "Burger Janssen",
                "Patriot en revolutionair",
                "Een enthousiaste aanhanger van de nieuwe republikeinse idealen",
                "🗽",
            )
            .with_responses("revolutie", &[
                "Eindelijk zijn we bevrijd van de Oranje-tirannie!",
                "De Franse revolutie heeft ons geïnspireerd tot vrijheid!",
                "Nu zijn we echte burgers, geen onderdanen meer!",
            ])
            .with_responses("franse", &[
                "Onze Franse broeders hebben ons geholpen!",
                "Zonder Frankrijk waren we nooit bevrijd.",
                "Liberté, Égalité, Fraternité - dat is onze leus!",
            ])
            .with_responses("vrijheid", &[
                "Alle mensen zijn gelijk geboren!",
                "De rechten van de mens zijn eindelijk erkend.",
                "Geen koning meer, maar een vrije republiek!",
            ])
            .with_responses("oranje", &[
                "De stadhouder is gevlucht naar Engeland!",
                "Het Huis van Oranje heeft ons lang onderdrukt.",
                "Weg met de erfelijke macht!",
            ]),
        ],
        hints: vec![
            YearHint::new(1793, 1797, "Je bent heel dicht bij het jaar van de Bataafse Revolutie!"),
            YearHint::new(1790, 1800, "Je zit in de goede periode van de Franse revolutionaire invloed."),
            YearHint::new(1780, 1810, "Je zit in de late 18e eeuw, denk aan de Franse revolutie."),
        ],
    }
}

fn hongerwinter() -> Scenario {
    Scenario {
        id: "hongerwinter".to_string(),
        title: "Hongerwinter".to_string(),
        period: "Tweede Wereldoorlog".to_string(),
        target_year: 1944,
        description: "De laatste winter van de oorlog. West-Nederland lijdt honger door de Duitse blokkade na de mislukte operatie Market Garden.".to_string(),
        setting: "Je staat in de rij voor een gaarkeuken in een uitgehongerde stad.".to_string(),
        mystery: "In welk jaar vond deze verschrikkelijke hongerwinter plaats?".to_string(),
        clues: vec![
            clue(
                "observe_5",
                ClueKind::Observe,
                "Uitgehongerde mensen",
                "Kijk naar de mensen in de rij",
                "Magere mensen in dunne jassen staan geduldig te wachten. Kinderen hebben holle wangen en oude mensen leunen zwaar op stokken. Iedereen kijkt hoopvol naar de gaarkeuken.",
            ),
            clue(
                "listen_5",
                ClueKind::Listen,
                "Radio Oranje",
                "Luister naar de illegale radio",
                "Stem van Radio Oranje: \"Volhouders! De geallieerden rukken op. Het zuiden is al bevrijd. Nog even volhouden, de bevrijding komt eraan!\"",
            ),
            clue(
                "read_5",
                ClueKind::Read,
                "Ondergronds pamflet",
                "Lees het illegale blaadje",
                "HET VRIJE WOORD: De Duitsers blokkeren alle voedsel naar het westen. Maar de Tommies en Amerikanen komen eraan! Nederland zal herrijzen!",
            ),
        ],
        npcs: vec![
            Npc::new(
                "burger_hongerwinter",
                "Mevrouw De Vries",
                "Moeder van drie kinderen",
                "Een uitgeputte vrouw die probeert haar gezin in leven te houden",
                "👩‍👧‍👦",
            )
            .with_responses("eten", &[
                "We hebben al dagen alleen tulpenbollen gegeten.",
                "De kinderen huilen van de honger, maar er is niets.",
                "Gisteren heb ik de laatste aardappel opgegeten.",
            ])
            .with_responses("oorlog", &[
                "De Duitsers blokkeren al het voedsel naar het westen.",
                "Ze straffen ons voor de spoorwegstaking.",
                "Wanneer komt de bevrijding eindelijk?",
            ])
            .with_responses("bevrijding", &[
                "Radio Oranje zegt dat de geallieerden komen!",
                "Het zuiden is al bevrijd, wij moeten nog wachten.",
                "Mijn man zit ondergedoken, hopelijk overleeft hij het.",
            ])
            .with_responses("kinderen", &[
                "Mijn kleine Jan is zo mager geworden.",
                "De kinderen begrijpen niet waarom er geen eten is.",
                "Ik bid elke dag dat ze het overleven.",
            ]),
        ],
        hints: vec![
            YearHint::new(1943, 1945, "Je bent heel dicht bij het jaar van de Hongerwinter!"),
            YearHint::new(1940, 1945, "Je zit in de oorlogsjaren, denk aan de laatste winter."),
            YearHint::new(1935, 1950, "Je zit rond de Tweede Wereldoorlog, maar denk aan de hongerwinter."),
        ],
    }
}

fn provo() -> Scenario {
    Scenario {
        id: "provo".to_string(),
        title: "Provo-beweging".to_string(),
        period: "Jaren Zestig".to_string(),
        target_year: 1966,
        description: "Jonge rebellen in Amsterdam schudden het establishment wakker met happenings, witte fietsen en ludieke acties.".to_string(),
        setting: "Je staat op het Spui in Amsterdam waar een groep Provo's een happening organiseert.".to_string(),
        mystery: "In welk jaar was de Provo-beweging op zijn hoogtepunt?".to_string(),
        clues: vec![
            clue(
                "observe_6",
                ClueKind::Observe,
                "Witte fietsen",
                "Kijk naar de bijzondere fietsen",
                "Overal staan witte fietsen die iedereen gratis mag gebruiken. Jongeren met lang haar en kleurrijke kleding fietsen erop rond. Het is een protest tegen de auto-maatschappij.",
            ),
            clue(
                "listen_6",
                ClueKind::Listen,
                "Happening op het Spui",
                "Luister naar de Provo's",
                "Provo: \"Het gezag moet worden geïrriteerd! Weg met de burgerlijke saaiheid!\" Menigte: \"Provo! Provo!\" Politie: \"Doorlopen, doorlopen!\"",
            ),
            clue(
                "read_6",
                ClueKind::Read,
                "Provo-blad",
                "Lees het underground magazine",
                "PROVO NR. 9: \"De jeugd heeft de toekomst! Weg met de consumptiemaatschappij! Maak van Amsterdam een magisch centrum!\"",
            ),
        ],
        npcs: vec![
            Npc::new(
                "provo_activist",
                "Roel",
                "Provo-activist",
                "Een jonge rebel met lang haar die het establishment uitdaagt",
                "✌️",
            )
            .with_responses("happening", &[
                "We irriteren het gezag met ludieke acties!",
                "Happenings zijn kunst en protest tegelijk.",
                "We maken de burgers wakker uit hun slaap!",
            ])
            .with_responses("autoriteit", &[
                "Het establishment is saai en onderdrukkend!",
                "Politie en politici begrijpen de jeugd niet.",
                "We hebben geen zin in hun burgerlijke regels!",
            ])
            .with_responses("jeugd", &[
                "De jeugd heeft de toekomst, niet die oude zakken!",
                "Wij maken van de wereld een betere plek.",
                "Lang haar en vrije liefde, dat is onze revolutie!",
            ])
            .with_responses("fietsen", &[
                "Witte fietsen voor iedereen! Gratis vervoer!",
                "Auto's vervuilen de stad, fietsen zijn de toekomst.",
                "Het Witte Fietsenplan is onze gift aan Amsterdam!",
            ]),
        ],
        hints: vec![
            YearHint::new(1964, 1968, "Je bent heel dicht bij het hoogtepunt van de Provo-beweging!"),
            YearHint::new(1960, 1970, "Je zit in de jaren zestig, denk aan de jeugdrebellie."),
            YearHint::new(1955, 1975, "Je zit rond de jaren zestig, maar denk aan de Provo-tijd."),
        ],
    }
}
