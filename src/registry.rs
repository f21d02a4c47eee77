//! Tag → constructor tables.
//!
//! Two independent tag spaces: plain 4CC tags, and 16-byte user types for
//! boxes whose outer tag is `uuid`. Lookups never fail; unregistered tags
//! construct the byte-preserving [`UnknownBox`]. Custom registrations are
//! expected to complete before parsing begins — the tables are process-wide,
//! read-mostly state.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use four_cc::FourCC;

use crate::boxes::*;
use crate::types::{self, UserType};
use crate::Mp4Box;

type BoxConstructor = fn() -> Box<dyn Mp4Box>;

fn construct<T: Mp4Box + Default>() -> Box<dyn Mp4Box> {
    Box::new(T::default())
}

static BOX_REGISTRY: LazyLock<RwLock<HashMap<FourCC, BoxConstructor>>> = LazyLock::new(|| {
    let mut registry: HashMap<FourCC, BoxConstructor> = HashMap::new();

    registry.insert(types::FTYP, construct::<FileTypeBox>);
    registry.insert(types::MOOV, construct::<MovieBox>);
    registry.insert(types::MVHD, construct::<MovieHeaderBox>);
    registry.insert(types::TRAK, construct::<TrackBox>);
    registry.insert(types::TKHD, construct::<TrackHeaderBox>);
    registry.insert(types::MDIA, construct::<MediaBox>);
    registry.insert(types::MDHD, construct::<MediaHeaderBox>);
    registry.insert(types::HDLR, construct::<HandlerBox>);
    registry.insert(types::ELNG, construct::<ExtendedLanguageBox>);
    registry.insert(types::MINF, construct::<MediaInformationBox>);
    registry.insert(types::VMHD, construct::<VideoMediaHeaderBox>);
    registry.insert(types::SMHD, construct::<SoundMediaHeaderBox>);
    registry.insert(types::NMHD, construct::<NullMediaHeaderBox>);
    registry.insert(types::DINF, construct::<DataInformationBox>);
    registry.insert(types::DREF, construct::<DataReferenceBox>);
    registry.insert(types::URL, construct::<DataEntryBox>);
    registry.insert(types::URN, construct::<DataEntryBox>);

    registry.insert(types::STBL, construct::<SampleTableBox>);
    registry.insert(types::STSD, construct::<SampleDescriptionBox>);
    registry.insert(types::STTS, construct::<TimeToSampleBox>);
    registry.insert(types::CTTS, construct::<CompositionOffsetBox>);
    registry.insert(types::STSC, construct::<SampleToChunkBox>);
    registry.insert(types::STSZ, construct::<SampleSizeBox>);
    registry.insert(types::STCO, construct::<ChunkOffsetBox>);
    registry.insert(types::STSS, construct::<SyncSampleBox>);
    registry.insert(types::STDP, construct::<DegradationPriorityBox>);

    registry.insert(types::COLR, construct::<ColourInformationBox>);
    registry.insert(types::PASP, construct::<PixelAspectRatioBox>);
    registry.insert(types::CLAP, construct::<CleanApertureBox>);
    registry.insert(types::BTRT, construct::<BitRateBox>);

    registry.insert(types::AVC1, construct::<VisualSampleEntryBox>);
    registry.insert(types::AVC2, construct::<VisualSampleEntryBox>);
    registry.insert(types::AVC3, construct::<VisualSampleEntryBox>);
    registry.insert(types::AVC4, construct::<VisualSampleEntryBox>);
    registry.insert(types::DVAV, construct::<VisualSampleEntryBox>);
    registry.insert(types::DVA1, construct::<VisualSampleEntryBox>);
    registry.insert(types::DVHE, construct::<VisualSampleEntryBox>);
    registry.insert(types::DVH1, construct::<VisualSampleEntryBox>);
    registry.insert(types::HEV1, construct::<VisualSampleEntryBox>);
    registry.insert(types::HVC1, construct::<VisualSampleEntryBox>);
    registry.insert(types::AVCC, construct::<AvcConfigurationBox>);
    registry.insert(types::AVCE, construct::<DolbyVisionAvcConfigurationBox>);
    registry.insert(types::HVCC, construct::<HevcConfigurationBox>);
    registry.insert(types::HVCE, construct::<DolbyVisionHevcConfigurationBox>);
    registry.insert(types::DVCC, construct::<DoviConfigurationBox>);
    registry.insert(types::DVVC, construct::<DoviConfigurationBox>);
    registry.insert(types::DVWC, construct::<DoviConfigurationBox>);

    registry.insert(types::MVEX, construct::<MovieExtendsBox>);
    registry.insert(types::MEHD, construct::<MovieExtendsHeaderBox>);
    registry.insert(types::TREX, construct::<TrackExtendsBox>);
    registry.insert(types::MOOF, construct::<MovieFragmentBox>);
    registry.insert(types::MFHD, construct::<MovieFragmentHeaderBox>);
    registry.insert(types::TRAF, construct::<TrackFragmentBox>);
    registry.insert(types::TFHD, construct::<TrackFragmentHeaderBox>);
    registry.insert(types::TFDT, construct::<TrackFragmentBaseMediaDecodeTimeBox>);
    registry.insert(types::TRUN, construct::<TrackFragmentRunBox>);

    registry.insert(types::SINF, construct::<ProtectionSchemeInfoBox>);
    registry.insert(types::SCHI, construct::<SchemeInformationBox>);
    registry.insert(types::SCHM, construct::<SchemeTypeBox>);
    registry.insert(types::FRMA, construct::<OriginalFormatBox>);
    registry.insert(types::TENC, construct::<TrackEncryptionBox>);
    registry.insert(types::PSSH, construct::<ProtectionSystemSpecificHeaderBox>);
    registry.insert(types::SENC, construct::<SampleEncryptionBox>);

    RwLock::new(registry)
});

static UUID_BOX_REGISTRY: LazyLock<RwLock<HashMap<UserType, BoxConstructor>>> =
    LazyLock::new(|| {
        let mut registry: HashMap<UserType, BoxConstructor> = HashMap::new();
        registry.insert(
            types::SAMPLE_ENCRYPTION_USER_TYPE,
            construct::<SampleEncryptionBox>,
        );
        RwLock::new(registry)
    });

/// Registers a constructor for a plain 4CC tag, replacing any previous one.
pub fn register_box(box_type: FourCC, constructor: fn() -> Box<dyn Mp4Box>) {
    BOX_REGISTRY.write().unwrap().insert(box_type, constructor);
}

/// Registers a constructor for a `uuid` box user type.
pub fn register_uuid_box(user_type: UserType, constructor: fn() -> Box<dyn Mp4Box>) {
    UUID_BOX_REGISTRY
        .write()
        .unwrap()
        .insert(user_type, constructor);
}

pub fn new_box(box_type: FourCC) -> Box<dyn Mp4Box> {
    match BOX_REGISTRY.read().unwrap().get(&box_type) {
        Some(constructor) => constructor(),
        None => construct::<UnknownBox>(),
    }
}

pub fn new_uuid_box(user_type: UserType) -> Box<dyn Mp4Box> {
    match UUID_BOX_REGISTRY.read().unwrap().get(&user_type) {
        Some(constructor) => constructor(),
        None => construct::<UnknownBox>(),
    }
}
