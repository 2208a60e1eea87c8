use std::path::Path;
use std::{env, io};

use rand_core::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub fn default_gen() -> impl RngCore {
    Xoshiro256PlusPlus::seed_from_u64(0x800D_BA5E_5EED_1234_u64)
}

mod zobrist {
    use std::io::{self, BufWriter, Write};
    use std::{fs, path::Path};

    use arbiter_base::geometry;
    use arbiter_base::types::{Color, File, Piece, PieceKind, Square};
    use rand_core::RngCore;

    struct Zobrist {
        pieces: [[u64; 64]; Piece::COUNT],
        move_side: u64,
        castling: [u64; 16],
        enpassant: [u64; 8],
        castling_kingside: [u64; 2],
        castling_queenside: [u64; 2],
    }

    fn castling_delta(pieces: &[[u64; 64]; Piece::COUNT], c: Color, files: [File; 4]) -> u64 {
        let rook = Piece::new(c, PieceKind::Rook).index();
        let king = Piece::new(c, PieceKind::King).index();
        let rank = geometry::castling_rank(c);
        let [king_src, king_dst, rook_src, rook_dst] = files.map(|f| Square::from_parts(f, rank));
        pieces[king][king_src.index()]
            ^ pieces[king][king_dst.index()]
            ^ pieces[rook][rook_src.index()]
            ^ pieces[rook][rook_dst.index()]
    }

    impl Zobrist {
        fn generate<R: RngCore>(gen: &mut R) -> Zobrist {
            let pieces = {
                let mut res = [[0_u64; 64]; Piece::COUNT];
                for sub in res.iter_mut() {
                    for x in sub {
                        *x = gen.next_u64();
                    }
                }
                res
            };
            let castling = {
                let base = [(); 4].map(|_| gen.next_u64());
                let mut res = [0_u64; 16];
                for (i, val) in res.iter_mut().enumerate() {
                    for (j, base_val) in base.iter().enumerate() {
                        if (i >> j) & 1 != 0 {
                            *val ^= base_val;
                        }
                    }
                }
                res
            };
            Zobrist {
                pieces,
                move_side: gen.next_u64(),
                castling,
                enpassant: [(); 8].map(|_| gen.next_u64()),
                castling_kingside: [Color::White, Color::Black]
                    .map(|c| castling_delta(&pieces, c, [File::E, File::G, File::H, File::F])),
                castling_queenside: [Color::White, Color::Black]
                    .map(|c| castling_delta(&pieces, c, [File::E, File::C, File::A, File::D])),
            }
        }

        fn generate_default() -> Zobrist {
            Self::generate(&mut super::default_gen())
        }

        fn output<W: Write>(&self, w: &mut W) -> io::Result<()> {
            writeln!(w, "const PIECES: [[u64; 64]; Piece::COUNT] = [")?;
            for (i, sub) in self.pieces.iter().enumerate() {
                writeln!(w, "    /*{:2}*/ [", i)?;
                for (i, hsh) in sub.iter().enumerate() {
                    writeln!(w, "        /*{:2}*/ {:#x},", i, hsh)?;
                }
                writeln!(w, "    ],")?;
            }
            writeln!(w, "];\n")?;

            writeln!(w, "pub const MOVE_SIDE: u64 = {:#x};\n", self.move_side)?;

            writeln!(w, "const CASTLING: [u64; 16] = [")?;
            for (i, sub) in self.castling.iter().enumerate() {
                writeln!(w, "    /*{:2}*/ {:#x},", i, sub)?;
            }
            writeln!(w, "];\n")?;

            writeln!(w, "const ENPASSANT: [u64; 8] = [")?;
            for (i, sub) in self.enpassant.iter().enumerate() {
                writeln!(w, "    /*{:2}*/ {:#x},", i, sub)?;
            }
            writeln!(w, "];\n")?;

            writeln!(
                w,
                "const CASTLING_KINGSIDE: [u64; 2] = [{:#x}, {:#x}];",
                self.castling_kingside[0], self.castling_kingside[1]
            )?;
            writeln!(
                w,
                "const CASTLING_QUEENSIDE: [u64; 2] = [{:#x}, {:#x}];",
                self.castling_queenside[0], self.castling_queenside[1]
            )?;

            Ok(())
        }
    }

    pub fn gen(out_path: &Path) -> io::Result<()> {
        Zobrist::generate_default().output(&mut BufWriter::new(&fs::File::create(out_path)?))?;
        Ok(())
    }
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    zobrist::gen(&Path::new(&out_dir).join("zobrist.rs"))?;

    Ok(())
}
