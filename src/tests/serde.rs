use crate::{
    prelude::*,
    tests::toolkit::{gps_frames, CANNED_1060},
};

#[test]
fn ephemeris_record() {
    let assembler = EphemerisAssembler::default();
    let sv = SV::new(Constellation::GPS, 12);
    let record = gps_frames(sv, 69)
        .into_iter()
        .filter_map(|frame| assembler.push(frame).unwrap())
        .next()
        .unwrap();

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["GPS"]["kepler"]["week"], 2110);
    assert_eq!(value["GPS"]["kepler"]["iode"], 69);
    assert_eq!(value["GPS"]["ura_index"], 1);

    let parsed: EphemerisRecord = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.kepler().unwrap().toe, 57_600.0);
}

#[test]
fn rtcm_message() {
    let msg = crate::rtcm::decode(&CANNED_1060).unwrap();
    let value = serde_json::to_value(&msg).unwrap();
    let header = &value["OrbitClock"]["header"];
    assert_eq!(header["provider_id"], 270);
    assert_eq!(header["epoch_s"], 345_600);
    assert_eq!(value["OrbitClock"]["corrections"][0]["iode"], 69);
}
