//! Box type tags and the extended `uuid` type space.

use four_cc::FourCC;
use uuid::Uuid;

pub type UserType = Uuid;

pub const AVCC: FourCC = FourCC(*b"avcC");
pub const AVCE: FourCC = FourCC(*b"avcE");
pub const BTRT: FourCC = FourCC(*b"btrt");
pub const CLAP: FourCC = FourCC(*b"clap");
pub const COLR: FourCC = FourCC(*b"colr");
pub const CTTS: FourCC = FourCC(*b"ctts");
pub const DINF: FourCC = FourCC(*b"dinf");
pub const DREF: FourCC = FourCC(*b"dref");
pub const DVCC: FourCC = FourCC(*b"dvcC");
pub const DVVC: FourCC = FourCC(*b"dvvC");
pub const DVWC: FourCC = FourCC(*b"dvwC");
pub const ELNG: FourCC = FourCC(*b"elng");
pub const ENCA: FourCC = FourCC(*b"enca");
pub const ENCS: FourCC = FourCC(*b"encs");
pub const ENCT: FourCC = FourCC(*b"enct");
pub const ENCV: FourCC = FourCC(*b"encv");
pub const FREE: FourCC = FourCC(*b"free");
pub const FRMA: FourCC = FourCC(*b"frma");
pub const FTYP: FourCC = FourCC(*b"ftyp");
pub const HDLR: FourCC = FourCC(*b"hdlr");
pub const HVCC: FourCC = FourCC(*b"hvcC");
pub const HVCE: FourCC = FourCC(*b"hvcE");
pub const MDAT: FourCC = FourCC(*b"mdat");
pub const MDHD: FourCC = FourCC(*b"mdhd");
pub const MDIA: FourCC = FourCC(*b"mdia");
pub const MEHD: FourCC = FourCC(*b"mehd");
pub const MFHD: FourCC = FourCC(*b"mfhd");
pub const MINF: FourCC = FourCC(*b"minf");
pub const MOOF: FourCC = FourCC(*b"moof");
pub const MOOV: FourCC = FourCC(*b"moov");
pub const MVEX: FourCC = FourCC(*b"mvex");
pub const MVHD: FourCC = FourCC(*b"mvhd");
pub const NMHD: FourCC = FourCC(*b"nmhd");
pub const PASP: FourCC = FourCC(*b"pasp");
pub const PSSH: FourCC = FourCC(*b"pssh");
pub const SAIO: FourCC = FourCC(*b"saio");
pub const SAIZ: FourCC = FourCC(*b"saiz");
pub const SCHI: FourCC = FourCC(*b"schi");
pub const SCHM: FourCC = FourCC(*b"schm");
pub const SENC: FourCC = FourCC(*b"senc");
pub const SINF: FourCC = FourCC(*b"sinf");
pub const SMHD: FourCC = FourCC(*b"smhd");
pub const STBL: FourCC = FourCC(*b"stbl");
pub const STCO: FourCC = FourCC(*b"stco");
pub const STDP: FourCC = FourCC(*b"stdp");
pub const STSC: FourCC = FourCC(*b"stsc");
pub const STSD: FourCC = FourCC(*b"stsd");
pub const STSS: FourCC = FourCC(*b"stss");
pub const STSZ: FourCC = FourCC(*b"stsz");
pub const STTS: FourCC = FourCC(*b"stts");
pub const TENC: FourCC = FourCC(*b"tenc");
pub const TFDT: FourCC = FourCC(*b"tfdt");
pub const TFHD: FourCC = FourCC(*b"tfhd");
pub const TKHD: FourCC = FourCC(*b"tkhd");
pub const TRAF: FourCC = FourCC(*b"traf");
pub const TRAK: FourCC = FourCC(*b"trak");
pub const TREX: FourCC = FourCC(*b"trex");
pub const TRUN: FourCC = FourCC(*b"trun");
pub const URL: FourCC = FourCC(*b"url ");
pub const URN: FourCC = FourCC(*b"urn ");
pub const UUID: FourCC = FourCC(*b"uuid");
pub const VMHD: FourCC = FourCC(*b"vmhd");

pub const DVAV: FourCC = FourCC(*b"dvav");
pub const DVA1: FourCC = FourCC(*b"dva1");
pub const DVHE: FourCC = FourCC(*b"dvhe");
pub const DVH1: FourCC = FourCC(*b"dvh1");
pub const AVC1: FourCC = FourCC(*b"avc1");
pub const AVC2: FourCC = FourCC(*b"avc2");
pub const AVC3: FourCC = FourCC(*b"avc3");
pub const AVC4: FourCC = FourCC(*b"avc4");
pub const HEV1: FourCC = FourCC(*b"hev1");
pub const HVC1: FourCC = FourCC(*b"hvc1");

pub const CENC: FourCC = FourCC(*b"cenc");
pub const DASH: FourCC = FourCC(*b"dash");
pub const HINT: FourCC = FourCC(*b"hint");
pub const ISO2: FourCC = FourCC(*b"iso2");
pub const ISO6: FourCC = FourCC(*b"iso6");
pub const ISOM: FourCC = FourCC(*b"isom");
pub const MSDH: FourCC = FourCC(*b"msdh");
pub const SOUN: FourCC = FourCC(*b"soun");
pub const VIDE: FourCC = FourCC(*b"vide");

pub const NCLC: FourCC = FourCC(*b"nclc");
pub const NCLX: FourCC = FourCC(*b"nclx");
pub const RICC: FourCC = FourCC(*b"rICC");
pub const PROF: FourCC = FourCC(*b"prof");

/// PIFF spelling of the sample encryption box, carried in a `uuid` box.
pub const SAMPLE_ENCRYPTION_USER_TYPE: UserType = Uuid::from_bytes([
    0xA2, 0x39, 0x4F, 0x52, 0x5A, 0x9B, 0x4F, 0x14, 0xA2, 0x44, 0x6C, 0x42, 0x7C, 0x64, 0x8D, 0xF4,
]);

/// Derives the legacy vendor-extension user type for a plain 4CC tag. The
/// fixed 12-byte tail makes every 4CC addressable from the `uuid` type space.
pub fn user_type_for(box_type: FourCC) -> UserType {
    let FourCC([a, b, c, d]) = box_type;
    Uuid::from_bytes([
        a, b, c, d, 0x00, 0x11, 0x00, 0x10, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71,
    ])
}

#[test]
fn derived_user_type_keeps_the_tag() {
    let user_type = user_type_for(MOOV);
    assert_eq!(&user_type.as_bytes()[..4], b"moov");
}
