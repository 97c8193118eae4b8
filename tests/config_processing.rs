//! End-to-end runs of configuration text and message streams.

use enigma::{process, process_with, EnigmaError, MachineConfig, ProcessError, RotorType, Setting};

const DEFAULT_CONF: &str = include_str!("../conf/default.conf");

const HIAWATHA_IN: &str = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
FROM HIS SHOULDER HIAWATHA
TOOK THE CAMERA OF ROSEWOOD
MADE OF SLIDING FOLDING ROSEWOOD
NEATLY PUT IT ALL TOGETHER
";

const HIAWATHA_OUT: &str = "QVPQS OKOIL PUBKJ ZPISF XDW
BHCNS CXNUO AATZX SRCFY DGU
FLPNX GXIXT YJUJR CAUGE UNCFM KUF
WJFGK CIIRG XODJG VCGPQ OH
";

fn default_config() -> MachineConfig {
    DEFAULT_CONF.parse().unwrap()
}

fn run(input: &str) -> Result<String, ProcessError> {
    let mut out = Vec::new();
    process(&default_config(), input.as_bytes(), &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn default_config_catalog() {
    let config = default_config();
    assert_eq!(config.alphabet.size(), 26);
    assert_eq!(config.num_rotors, 5);
    assert_eq!(config.num_pawls, 3);
    assert_eq!(config.rotors.len(), 12);

    let vi = config.rotors.iter().find(|r| r.name == "VI").unwrap();
    assert_eq!(vi.kind, RotorType::Moving);
    assert_eq!(vi.notches, "ZM");

    let b = config.rotors.iter().find(|r| r.name == "B").unwrap();
    assert_eq!(b.kind, RotorType::Reflector);
    assert!(b.cycles.ends_with("(RX) (SZ) (TV)"));
}

#[test]
fn default_reflectors_are_derangements() {
    let config = default_config();
    let machine = config.build_machine().unwrap();
    for (_, rotor) in machine.catalog().iter() {
        if rotor.reflecting() {
            assert!(rotor.permutation().derangement(), "{}", rotor.name());
        }
    }
}

#[test]
fn encrypt_hiawatha_stream() {
    assert_eq!(run(HIAWATHA_IN).unwrap(), HIAWATHA_OUT);
}

#[test]
fn decrypt_hiawatha_stream() {
    let input = format!(
        "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)\n{}",
        HIAWATHA_OUT
    );
    let out = run(&input).unwrap();
    let expected: Vec<String> = HIAWATHA_IN
        .lines()
        .skip(1)
        .map(|line| {
            let joined: String = line.split_whitespace().collect();
            joined
                .as_bytes()
                .chunks(5)
                .map(|c| std::str::from_utf8(c).unwrap())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    assert_eq!(out.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn second_setting_line_resets_positions() {
    let input = "* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
FROM HIS SHOULDER HIAWATHA
* B Beta III IV I AXLE (HQ) (EX) (IP) (TR) (BY)
FROM HIS SHOULDER HIAWATHA
";
    let out = run(input).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["QVPQS OKOIL PUBKJ ZPISF XDW"; 2]);
}

#[test]
fn process_with_reuses_machine() {
    let config = default_config();
    let mut machine = config.build_machine().unwrap();
    let mut out = Vec::new();
    process_with(&mut machine, HIAWATHA_IN.as_bytes(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), HIAWATHA_OUT);
    assert!(machine.settings().iter().any(|&s| s != 0));
}

#[test]
fn missing_setting() {
    let err = run("FROM HIS SHOULDER\n").unwrap_err();
    assert!(matches!(err, ProcessError::Enigma(EnigmaError::MissingSetting)));
}

#[test]
fn first_rotor_must_reflect() {
    let err = run("* Beta B III IV I AXLE\nA\n").unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Enigma(EnigmaError::FirstRotorNotReflector(ref name)) if name == "Beta"
    ));
}

#[test]
fn duplicate_rotor_in_setting() {
    let err = run("* B Beta III III I AXLE\nA\n").unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Enigma(EnigmaError::DuplicateRotor(_))
    ));
}

#[test]
fn unknown_rotor_in_setting() {
    let err = run("* B Beta III IX I AXLE\nA\n").unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Enigma(EnigmaError::RotorsNotFound { .. })
    ));
}

#[test]
fn positions_outside_alphabet() {
    let err = run("* B Beta III IV I AX1E\nA\n").unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Enigma(EnigmaError::SymbolNotFound('1'))
    ));
}

#[test]
fn wrong_position_count() {
    let err = run("* B Beta III IV I AXL\nA\n").unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Enigma(EnigmaError::SettingLength {
            expected: 4,
            actual: 3
        })
    ));
}

#[test]
fn setting_line_too_short() {
    let err = run("* B Beta III\nA\n").unwrap_err();
    assert!(matches!(err, ProcessError::Enigma(EnigmaError::BadSetting(_))));
}

#[test]
fn bad_plugboard() {
    let config = default_config();
    let mut machine = config.build_machine().unwrap();
    let setting = Setting::parse("* B Beta III IV I AXLE (HQ (EX)", 5).unwrap();
    assert!(matches!(
        setting.apply(&mut machine),
        Err(EnigmaError::MalformedCycles(_))
    ));
    assert!(machine.slots().is_empty());
}

#[test]
fn message_with_foreign_symbol() {
    let err = run("* B Beta III IV I AXLE\nHELLO WORLD!\n").unwrap_err();
    assert!(matches!(
        err,
        ProcessError::Enigma(EnigmaError::SymbolNotFound('!'))
    ));
}

#[test]
fn rejected_setting_keeps_previous_machine() {
    let config = default_config();
    let mut machine = config.build_machine().unwrap();
    "* B Beta III IV I AXLE (HQ) (EX)"
        .parse::<Setting>()
        .unwrap()
        .apply(&mut machine)
        .unwrap();
    let slots = machine.slots().to_vec();
    let settings = machine.settings();
    let plugboard = machine.plugboard().clone();

    let short = Setting::parse("* C Gamma II V VI AXL", 5).unwrap();
    assert_eq!(
        short.apply(&mut machine),
        Err(EnigmaError::SettingLength {
            expected: 4,
            actual: 3
        })
    );
    let reflector_turned = Setting::parse("* C Gamma II B VI AXLE", 5).unwrap();
    assert_eq!(
        reflector_turned.apply(&mut machine),
        Err(EnigmaError::ReflectorPosition(11))
    );

    assert_eq!(machine.slots(), &slots[..]);
    assert_eq!(machine.settings(), settings);
    assert_eq!(machine.plugboard(), &plugboard);
    let names: Vec<&str> = (0..5).map(|k| machine.rotor(k).unwrap().name()).collect();
    assert_eq!(names, vec!["B", "Beta", "III", "IV", "I"]);
}
