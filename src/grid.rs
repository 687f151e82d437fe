pub const V_MAX: f64 = 128.0; // 境界の最大温度
pub const MAX_TEMP_ERROR: f64 = 0.02; // 収束判定の閾値 (dtがこれ以下で終了)
pub const DT_SENTINEL: f64 = 100.0; // 初回イテレーション前のdt初期値

#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize, // 内部セルの行数 R
    cols: usize, // 内部セルの列数 C
    pub data: Vec<f64>,
}

impl Grid {
    /// (R+2) x (C+2) のグリッドを全セル0で確保する
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            rows,
            cols,
            data: vec![0.0; (rows + 2) * (cols + 2)],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 1行分のセル数 (境界列込み)
    pub fn stride(&self) -> usize {
        self.cols + 2
    }

    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.stride() + j]
    }

    /*
      境界条件の設定（実行中は二度と変更されない）
      - 内部セルと左列・上行は 0
      - 右列は (V_MAX/R)*i、下行は (V_MAX/C)*j の線形勾配
    */
    pub fn initialize(&mut self) {
        let stride = self.stride();

        for v in self.data.iter_mut() {
            *v = 0.0;
        }

        // 左列を0、右列を線形に増加させる
        for i in 0..=self.rows + 1 {
            self.data[i * stride] = 0.0;
            self.data[i * stride + self.cols + 1] = (V_MAX / self.rows as f64) * i as f64;
        }

        // 上行を0、下行を線形に増加させる
        for j in 0..=self.cols + 1 {
            self.data[j] = 0.0;
            self.data[(self.rows + 1) * stride + j] = (V_MAX / self.cols as f64) * j as f64;
        }
    }

    // 格子の温度を表示
    pub fn print(&self) {
        let stride = self.stride();
        for i in 0..=self.rows + 1 {
            for j in 0..=self.cols + 1 {
                print!("{:6.2} ", self.data[i * stride + j]);
            }
            println!();
        }
    }
}
