mod avcc;
mod btrt;
mod clap;
mod colr;
mod ctts;
mod dinf;
mod dref;
mod dvcc;
mod elng;
mod frma;
mod ftyp;
mod hdlr;
mod hvcc;
mod mdhd;
mod mdia;
mod mehd;
mod mfhd;
mod minf;
mod moof;
mod moov;
mod mvex;
mod mvhd;
mod nmhd;
mod pasp;
mod pssh;
mod sample_entry;
mod schi;
mod schm;
mod senc;
mod sinf;
mod smhd;
mod stbl;
mod stco;
mod stdp;
mod stsc;
mod stsd;
mod stss;
mod stsz;
mod stts;
mod tenc;
mod tfdt;
mod tfhd;
mod tkhd;
mod traf;
mod trak;
mod trex;
mod trun;
mod unknown;
mod url;
mod vmhd;

pub use self::{
    avcc::*, btrt::*, clap::*, colr::*, ctts::*, dinf::*, dref::*, dvcc::*, elng::*, frma::*,
    ftyp::*, hdlr::*, hvcc::*, mdhd::*, mdia::*, mehd::*, mfhd::*, minf::*, moof::*, moov::*,
    mvex::*, mvhd::*, nmhd::*, pasp::*, pssh::*, sample_entry::*, schi::*, schm::*, senc::*,
    sinf::*, smhd::*, stbl::*, stco::*, stdp::*, stsc::*, stsd::*, stss::*, stsz::*, stts::*,
    tenc::*, tfdt::*, tfhd::*, tkhd::*, traf::*, trak::*, trex::*, trun::*, unknown::*, url::*,
    vmhd::*,
};
